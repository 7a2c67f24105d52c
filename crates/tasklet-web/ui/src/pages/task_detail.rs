use gloo::timers::callback::Timeout;
use tasklet_shared::staging::DeletionStaging;
use tasklet_shared::{
  DELETE_TASK_FAILED,
  FETCH_TASK_FAILED,
  TaskDto,
  UNDO_DELETE_MS,
  UPDATE_STATUS_FAILED
};
use yew::{
  AttrValue,
  Callback,
  Html,
  MouseEvent,
  Properties,
  function_component,
  html,
  use_effect_with,
  use_force_update,
  use_mut_ref,
  use_state
};
use yew_router::prelude::{
  Link,
  use_navigator
};

use super::{
  format_timestamp,
  load_error_message
};
use crate::app::Route;
use crate::components::{
  ErrorAlert,
  Spinner
};
use crate::session::use_session;

#[derive(Properties, PartialEq)]
pub struct TaskDetailProps {
  pub id: AttrValue
}

fn timestamp_row(
  label: &'static str,
  value: Option<&str>
) -> Html {
  match value {
    | Some(value) => html! {
      <div class="kv">
        <strong>{ label }</strong>
        <div>{ format_timestamp(value) }</div>
      </div>
    },
    | None => html! {}
  }
}

/// One task with status toggle and a
/// staged delete that can be undone for
/// [`UNDO_DELETE_MS`].
#[function_component(TaskDetailPage)]
pub fn task_detail_page(
  props: &TaskDetailProps
) -> Html {
  let client = use_session().client();
  let navigator = use_navigator();
  let task = use_state(|| None::<TaskDto>);
  let error = use_state(|| None::<String>);
  let loading = use_state(|| true);
  let staging =
    use_mut_ref(DeletionStaging::default);
  let timer = use_mut_ref(|| None::<Timeout>);
  let trigger = use_force_update();

  {
    let task = task.clone();
    let error = error.clone();
    let loading = loading.clone();
    use_effect_with(
      (client.clone(), props.id.clone()),
      move |(client, id)| {
        let client = client.clone();
        let id = id.clone();
        loading.set(true);
        wasm_bindgen_futures::spawn_local(
          async move {
            match client.get(&id).await {
              | Ok(found) => {
                task.set(Some(found));
                error.set(None);
              }
              | Err(err) => {
                tracing::warn!(
                  task_id = %id,
                  error = %err,
                  "task fetch failed"
                );
                error.set(Some(
                  load_error_message(
                    &err,
                    FETCH_TASK_FAILED
                  )
                ));
              }
            }
            loading.set(false);
          }
        );
        || ()
      }
    );
  }

  {
    let staging = staging.clone();
    let timer = timer.clone();
    use_effect_with((), move |_| {
      move || {
        timer.borrow_mut().take();
        if staging.borrow().can_undo() {
          tracing::debug!(
            "left detail view, staged \
             deletion cancelled"
          );
        }
      }
    });
  }

  let on_toggle = {
    let client = client.clone();
    let task = task.clone();
    let error = error.clone();
    Callback::from(move |_: MouseEvent| {
      let Some(current) = (*task).clone()
      else {
        return;
      };
      let request = current.toggled();
      let client = client.clone();
      let task = task.clone();
      let error = error.clone();
      wasm_bindgen_futures::spawn_local(
        async move {
          match client.update(&request).await {
            | Ok(()) => {
              task.set(Some(request));
              error.set(None);
            }
            | Err(err) => {
              tracing::warn!(
                task_id = %request.id,
                error = %err,
                "status toggle failed"
              );
              error.set(Some(
                UPDATE_STATUS_FAILED
                  .to_string()
              ));
            }
          }
        }
      );
    })
  };

  let on_delete = {
    let client = client.clone();
    let staging = staging.clone();
    let timer = timer.clone();
    let trigger = trigger.clone();
    let id = props.id.to_string();
    Callback::from(move |_: MouseEvent| {
      if let Err(err) =
        staging.borrow_mut().begin(&id)
      {
        tracing::warn!(
          error = %err,
          "delete already staged"
        );
        return;
      }

      let client = client.clone();
      let staging = staging.clone();
      let timer_trigger = trigger.clone();
      let navigator = navigator.clone();
      let timeout = Timeout::new(
        UNDO_DELETE_MS as u32,
        move || {
          let Some(task_id) =
            staging.borrow_mut().fire()
          else {
            return;
          };
          timer_trigger.force_update();
          wasm_bindgen_futures::spawn_local(
            async move {
              let result = client
                .delete(&task_id)
                .await
                .map_err(|err| {
                  tracing::warn!(
                    task_id = %task_id,
                    error = %err,
                    "delete request failed"
                  );
                  DELETE_TASK_FAILED
                    .to_string()
                });
              let committed = {
                let mut staging =
                  staging.borrow_mut();
                staging.settle(result);
                staging.is_committed()
              };
              if committed {
                if let Some(navigator) =
                  &navigator
                {
                  navigator.push(&Route::Tasks);
                }
              } else {
                timer_trigger.force_update();
              }
            }
          );
        }
      );
      *timer.borrow_mut() = Some(timeout);
      trigger.force_update();
    })
  };

  let on_undo = {
    let staging = staging.clone();
    let timer = timer.clone();
    let trigger = trigger.clone();
    Callback::from(move |_: MouseEvent| {
      if staging.borrow_mut().undo() {
        timer.borrow_mut().take();
        trigger.force_update();
      }
    })
  };

  let staging = staging.borrow();
  let notice = if staging.shows_notice() {
    html! {
      <div class="notice" role="status">
        <span>{ "Task will be deleted in 5 seconds." }</span>
        <button
          class="btn"
          disabled={!staging.can_undo()}
          onclick={on_undo}
        >
          { "Undo Delete" }
        </button>
      </div>
    }
  } else {
    html! {}
  };

  let details = match &*task {
    | Some(task) => html! {
      <div class="panel">
        <h2>{ task.name.clone() }</h2>
        <p>{ task.description.clone() }</p>
        <div class="kv">
          <strong>{ "Status" }</strong>
          <div>{ task.status_label() }</div>
        </div>
        { timestamp_row("Created", task.created_at.as_deref()) }
        { timestamp_row("Updated", task.updated_at.as_deref()) }
        <div class="toolbar">
          <button class="btn ok" onclick={on_toggle}>
            { if task.status { "Mark Active" } else { "Mark Completed" } }
          </button>
          <Link<Route>
            to={Route::EditTask { id: task.id.clone() }}
            classes="btn"
          >
            { "Edit" }
          </Link<Route>>
          <button
            class="btn danger"
            disabled={!staging.is_idle()}
            onclick={on_delete}
          >
            { "Delete" }
          </button>
        </div>
      </div>
    },
    | None if *loading => html! {
      <Spinner label="Loading task..." />
    },
    | None => html! {}
  };

  html! {
    <section>
      <ErrorAlert message={(*error).clone()} />
      <ErrorAlert message={staging.error().map(str::to_string)} />
      { details }
      { notice }
      <p>
        <Link<Route> to={Route::Tasks}>{ "Back to tasks" }</Link<Route>>
      </p>
    </section>
  }
}
