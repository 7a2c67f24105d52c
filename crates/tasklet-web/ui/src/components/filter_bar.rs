use tasklet_shared::view::StatusFilter;
use yew::{
  Callback,
  Html,
  Properties,
  classes,
  function_component,
  html
};

#[derive(Properties, PartialEq)]
pub struct FilterBarProps {
  pub active:    StatusFilter,
  pub on_select: Callback<StatusFilter>
}

#[function_component(FilterBar)]
pub fn filter_bar(
  props: &FilterBarProps
) -> Html {
  html! {
    <div class="toolbar" role="group">
      {
        for StatusFilter::all().into_iter().map(|filter| {
          let on_select = props.on_select.clone();
          let active = props.active == filter;
          html! {
            <button
              class={classes!("btn", active.then_some("active"))}
              onclick={move |_| on_select.emit(filter)}
            >
              { filter.label() }
            </button>
          }
        })
      }
    </div>
  }
}
