use tasklet_shared::{
  LOGIN_FAILED,
  validate
};
use yew::{
  Callback,
  Html,
  SubmitEvent,
  function_component,
  html,
  use_state
};
use yew_router::prelude::{
  Link,
  Redirect,
  use_navigator
};

use super::bind_input;
use crate::app::Route;
use crate::components::ErrorAlert;
use crate::session::use_session;

#[function_component(LoginPage)]
pub fn login_page() -> Html {
  let session = use_session();
  let navigator = use_navigator();
  let email = use_state(String::new);
  let password = use_state(String::new);
  let error = use_state(|| None::<String>);
  let busy = use_state(|| false);

  if session.is_signed_in() {
    return html! { <Redirect<Route> to={Route::Tasks} /> };
  }

  let onsubmit = {
    let session = session.clone();
    let email = email.clone();
    let password = password.clone();
    let error = error.clone();
    let busy = busy.clone();
    Callback::from(move |e: SubmitEvent| {
      e.prevent_default();
      let credentials =
        match validate::login(
          &email, &password
        ) {
          | Ok(credentials) => credentials,
          | Err(err) => {
            error.set(Some(err.to_string()));
            return;
          }
        };

      error.set(None);
      busy.set(true);
      let client = session.client();
      let session = session.clone();
      let navigator = navigator.clone();
      let error = error.clone();
      let busy = busy.clone();
      wasm_bindgen_futures::spawn_local(
        async move {
          match client
            .login(&credentials)
            .await
          {
            | Ok(user) => {
              session.sign_in(user);
              if let Some(navigator) =
                &navigator
              {
                navigator.push(&Route::Tasks);
              }
            }
            | Err(err) => {
              tracing::warn!(
                error = %err,
                "login failed"
              );
              error.set(Some(
                LOGIN_FAILED.to_string()
              ));
            }
          }
          busy.set(false);
        }
      );
    })
  };

  html! {
    <section>
      <h2>{ "Sign In" }</h2>
      <form class="panel" {onsubmit}>
        <div class="field">
          <label for="email">{ "Email" }</label>
          <input
            id="email"
            type="email"
            value={(*email).clone()}
            oninput={bind_input(&email)}
          />
        </div>
        <div class="field">
          <label for="password">{ "Password" }</label>
          <input
            id="password"
            type="password"
            value={(*password).clone()}
            oninput={bind_input(&password)}
          />
        </div>
        <ErrorAlert message={(*error).clone()} />
        <button class="btn ok" type="submit" disabled={*busy}>
          { "Sign In" }
        </button>
      </form>
      <p>
        { "No account yet? " }
        <Link<Route> to={Route::Signup}>{ "Sign Up" }</Link<Route>>
      </p>
    </section>
  }
}
