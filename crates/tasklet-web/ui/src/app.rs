use tasklet_shared::SessionUser;
use yew::{
  Callback,
  ContextProvider,
  Html,
  function_component,
  html,
  use_effect_with,
  use_state
};
use yew_router::prelude::{
  BrowserRouter,
  Redirect,
  Routable,
  Switch
};

use crate::components::Header;
use crate::pages::{
  AddTaskPage,
  EditTaskPage,
  LoginPage,
  NotFoundPage,
  SignupPage,
  StatisticsPage,
  TaskDetailPage,
  TaskListPage
};
use crate::session::{
  self,
  SessionContext,
  use_session
};

const THEME_STORAGE_KEY: &str =
  "tasklet.theme";

#[derive(Clone, Routable, PartialEq, Debug)]
pub enum Route {
  #[at("/")]
  Root,
  #[at("/login")]
  Login,
  #[at("/signup")]
  Signup,
  #[at("/tasks")]
  Tasks,
  #[at("/tasks/add")]
  AddTask,
  #[at("/tasks/:id")]
  TaskDetail { id: String },
  #[at("/tasks/edit/:id")]
  EditTask { id: String },
  #[at("/statistics")]
  Statistics,
  #[not_found]
  #[at("/404")]
  NotFound
}

#[derive(
  Clone, Copy, PartialEq, Eq, Debug,
)]
pub enum ThemeMode {
  Day,
  Night
}

impl ThemeMode {
  fn from_storage(
    value: Option<&str>
  ) -> Self {
    match value {
      | Some("night") => Self::Night,
      | _ => Self::Day
    }
  }

  fn storage_value(self) -> &'static str {
    match self {
      | Self::Day => "day",
      | Self::Night => "night"
    }
  }

  pub fn toggled(self) -> Self {
    match self {
      | Self::Day => Self::Night,
      | Self::Night => Self::Day
    }
  }

  pub fn toggle_label(
    self
  ) -> &'static str {
    match self {
      | Self::Day => "Night",
      | Self::Night => "Day"
    }
  }
}

fn local_storage() -> Option<web_sys::Storage>
{
  web_sys::window().and_then(|window| {
    window.local_storage().ok().flatten()
  })
}

fn load_theme_mode() -> ThemeMode {
  let stored =
    local_storage().and_then(|storage| {
      storage
        .get_item(THEME_STORAGE_KEY)
        .ok()
        .flatten()
    });
  ThemeMode::from_storage(
    stored.as_deref()
  )
}

fn save_theme_mode(theme: ThemeMode) {
  if let Some(storage) = local_storage() {
    let _ = storage.set_item(
      THEME_STORAGE_KEY,
      theme.storage_value()
    );
  }
}

fn apply_theme(theme: ThemeMode) {
  let body = web_sys::window()
    .and_then(|window| window.document())
    .and_then(|document| document.body());
  if let Some(body) = body {
    body.set_class_name(
      theme.storage_value()
    );
  }
}

#[function_component(RootRedirect)]
fn root_redirect() -> Html {
  if use_session().is_signed_in() {
    html! { <Redirect<Route> to={Route::Tasks} /> }
  } else {
    html! { <Redirect<Route> to={Route::Login} /> }
  }
}

fn switch(route: Route) -> Html {
  match route {
    | Route::Root => {
      html! { <RootRedirect /> }
    }
    | Route::Login => {
      html! { <LoginPage /> }
    }
    | Route::Signup => {
      html! { <SignupPage /> }
    }
    | Route::Tasks => {
      html! { <TaskListPage /> }
    }
    | Route::AddTask => {
      html! { <AddTaskPage /> }
    }
    | Route::TaskDetail {
      id
    } => {
      html! { <TaskDetailPage {id} /> }
    }
    | Route::EditTask {
      id
    } => {
      html! { <EditTaskPage {id} /> }
    }
    | Route::Statistics => {
      html! { <StatisticsPage /> }
    }
    | Route::NotFound => {
      html! { <NotFoundPage /> }
    }
  }
}

#[function_component(App)]
pub fn app() -> Html {
  let user =
    use_state(session::load_session);
  let theme = use_state(load_theme_mode);

  use_effect_with(*theme, |theme| {
    apply_theme(*theme);
    save_theme_mode(*theme);
    || ()
  });

  let update = {
    let user = user.clone();
    Callback::from(
      move |next: Option<SessionUser>| {
        match &next {
          | Some(signed_in) => {
            tracing::info!(
              email = %signed_in.email,
              "signed in"
            );
          }
          | None => {
            tracing::info!("signed out");
          }
        }
        session::save_session(
          next.as_ref()
        );
        user.set(next);
      }
    )
  };

  let on_toggle_theme = {
    let theme = theme.clone();
    Callback::from(move |_| {
      theme.set(theme.toggled());
    })
  };

  let context = SessionContext {
    user: (*user).clone(),
    update
  };

  html! {
    <ContextProvider<SessionContext> {context}>
      <BrowserRouter>
        <Header theme={*theme} {on_toggle_theme} />
        <main>
          <Switch<Route> render={switch} />
        </main>
      </BrowserRouter>
    </ContextProvider<SessionContext>>
  }
}
