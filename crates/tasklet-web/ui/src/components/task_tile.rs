use tasklet_shared::TaskDto;
use yew::{
  Callback,
  Html,
  Properties,
  classes,
  function_component,
  html
};
use yew_router::prelude::Link;

use crate::app::Route;

#[derive(Properties, PartialEq)]
pub struct TaskTileProps {
  pub task:      TaskDto,
  pub on_toggle: Callback<String>
}

#[function_component(TaskTile)]
pub fn task_tile(
  props: &TaskTileProps
) -> Html {
  let id = props.task.id.clone();
  let on_toggle = props.on_toggle.clone();
  let toggle_id = id.clone();
  let has_description = !props
    .task
    .description
    .trim()
    .is_empty();

  html! {
    <div class={classes!("tile", props.task.status.then_some("done"))}>
      <label>
        <input
          type="checkbox"
          checked={props.task.status}
          onclick={move |_| on_toggle.emit(toggle_id.clone())}
        />
        <span class="tile-name">
          <Link<Route> to={Route::TaskDetail { id }}>
            { props.task.name.clone() }
          </Link<Route>>
        </span>
      </label>
      {
        if has_description {
          html! { <p>{ props.task.description.clone() }</p> }
        } else {
          html! {}
        }
      }
      <span class="badge">{ props.task.status_label() }</span>
    </div>
  }
}
