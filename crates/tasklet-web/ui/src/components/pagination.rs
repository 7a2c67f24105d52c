use yew::{
  Callback,
  Html,
  MouseEvent,
  Properties,
  function_component,
  html
};

#[derive(Properties, PartialEq)]
pub struct PaginationProps {
  pub page:     u32,
  pub has_prev: bool,
  pub has_more: bool,
  pub on_prev:  Callback<MouseEvent>,
  pub on_next:  Callback<MouseEvent>
}

#[function_component(Pagination)]
pub fn pagination(
  props: &PaginationProps
) -> Html {
  html! {
    <div class="pagination">
      <button
        class="btn"
        disabled={!props.has_prev}
        onclick={props.on_prev.clone()}
      >
        { "Prev" }
      </button>
      <span>{ format!("Page {}", props.page) }</span>
      <button
        class="btn"
        disabled={!props.has_more}
        onclick={props.on_next.clone()}
      >
        { "Next" }
      </button>
    </div>
  }
}
