use yew::{
  Callback,
  Html,
  MouseEvent,
  Properties,
  function_component,
  html
};
use yew_router::prelude::{
  Link,
  use_navigator
};

use crate::app::{
  Route,
  ThemeMode
};
use crate::session::use_session;

#[derive(Properties, PartialEq)]
pub struct HeaderProps {
  pub theme:           ThemeMode,
  pub on_toggle_theme: Callback<MouseEvent>
}

#[function_component(Header)]
pub fn header(
  props: &HeaderProps
) -> Html {
  let session = use_session();
  let navigator = use_navigator();

  let on_sign_out = {
    let session = session.clone();
    Callback::from(move |_: MouseEvent| {
      session.sign_out();
      if let Some(navigator) = &navigator {
        navigator.push(&Route::Login);
      }
    })
  };

  let account = match &session.user {
    | Some(user) if session.is_signed_in() => html! {
      <>
        <span>{ user.name.clone() }</span>
        <button class="btn" onclick={on_sign_out}>{ "Sign Out" }</button>
      </>
    },
    | _ => html! {
      <>
        <Link<Route> to={Route::Login}>{ "Sign In" }</Link<Route>>
        <Link<Route> to={Route::Signup}>{ "Sign Up" }</Link<Route>>
      </>
    }
  };

  html! {
    <header class="header">
      <span class="brand">
        <Link<Route> to={Route::Tasks}>{ "Tasklet" }</Link<Route>>
      </span>
      <button class="btn" onclick={props.on_toggle_theme.clone()}>
        { props.theme.toggle_label() }
      </button>
      { account }
    </header>
  }
}
