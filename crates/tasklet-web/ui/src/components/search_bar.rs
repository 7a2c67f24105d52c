use web_sys::HtmlInputElement;
use yew::{
  AttrValue,
  Callback,
  Html,
  InputEvent,
  Properties,
  TargetCast,
  function_component,
  html
};

#[derive(Properties, PartialEq)]
pub struct SearchBarProps {
  pub value:    AttrValue,
  pub on_input: Callback<String>
}

#[function_component(SearchBar)]
pub fn search_bar(
  props: &SearchBarProps
) -> Html {
  let on_input = props.on_input.clone();
  let oninput =
    Callback::from(move |e: InputEvent| {
      let input: HtmlInputElement =
        e.target_unchecked_into();
      on_input.emit(input.value());
    });

  html! {
    <input
      class="search"
      type="search"
      placeholder="Search tasks"
      value={props.value.clone()}
      {oninput}
    />
  }
}
