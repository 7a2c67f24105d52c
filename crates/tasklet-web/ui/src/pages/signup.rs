use tasklet_shared::{
  SIGNUP_FAILED,
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
  use_navigator
};

use super::bind_input;
use crate::app::Route;
use crate::components::ErrorAlert;
use crate::session::use_session;

#[function_component(SignupPage)]
pub fn signup_page() -> Html {
  let session = use_session();
  let navigator = use_navigator();
  let name = use_state(String::new);
  let email = use_state(String::new);
  let password = use_state(String::new);
  let error = use_state(|| None::<String>);
  let busy = use_state(|| false);

  let onsubmit = {
    let name = name.clone();
    let email = email.clone();
    let password = password.clone();
    let error = error.clone();
    let busy = busy.clone();
    Callback::from(move |e: SubmitEvent| {
      e.prevent_default();
      let signup = match validate::signup(
        &name, &email, &password
      ) {
        | Ok(signup) => signup,
        | Err(err) => {
          error.set(Some(err.to_string()));
          return;
        }
      };

      error.set(None);
      busy.set(true);
      let client = session.client();
      let navigator = navigator.clone();
      let error = error.clone();
      let busy = busy.clone();
      wasm_bindgen_futures::spawn_local(
        async move {
          match client.register(&signup).await
          {
            | Ok(message) => {
              tracing::info!(
                email = %signup.email,
                message = message.as_deref(),
                "registered account"
              );
              if let Some(navigator) =
                &navigator
              {
                navigator.push(&Route::Login);
              }
            }
            | Err(err) => {
              tracing::warn!(
                error = %err,
                "signup failed"
              );
              error.set(Some(
                err.message_or(SIGNUP_FAILED)
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
      <h2>{ "Sign Up" }</h2>
      <form class="panel" {onsubmit}>
        <div class="field">
          <label for="name">{ "Username" }</label>
          <input
            id="name"
            type="text"
            value={(*name).clone()}
            oninput={bind_input(&name)}
          />
        </div>
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
          { "Sign Up" }
        </button>
      </form>
      <p>
        { "Already registered? " }
        <Link<Route> to={Route::Login}>{ "Sign In" }</Link<Route>>
      </p>
    </section>
  }
}
