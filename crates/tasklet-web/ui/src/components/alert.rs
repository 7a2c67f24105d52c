use yew::{
  AttrValue,
  Html,
  Properties,
  function_component,
  html
};

#[derive(Properties, PartialEq)]
pub struct ErrorAlertProps {
  pub message: Option<AttrValue>
}

/// Inline error panel. Renders nothing
/// without a message.
#[function_component(ErrorAlert)]
pub fn error_alert(
  props: &ErrorAlertProps
) -> Html {
  match &props.message {
    | Some(message) => html! {
      <div class="alert" role="alert">{ message.clone() }</div>
    },
    | None => html! {}
  }
}

#[derive(Properties, PartialEq)]
pub struct SpinnerProps {
  #[prop_or(AttrValue::Static("Loading..."))]
  pub label: AttrValue
}

#[function_component(Spinner)]
pub fn spinner(
  props: &SpinnerProps
) -> Html {
  html! {
    <div class="spinner" aria-busy="true">{ props.label.clone() }</div>
  }
}
