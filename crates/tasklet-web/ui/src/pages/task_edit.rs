use tasklet_shared::{
  FETCH_TASK_FAILED,
  TaskDto,
  UPDATE_TASK_FAILED,
  validate
};
use yew::{
  AttrValue,
  Callback,
  Html,
  Properties,
  function_component,
  html,
  use_effect_with,
  use_state
};
use yew_router::prelude::{
  Link,
  use_navigator
};

use super::load_error_message;
use crate::app::Route;
use crate::components::{
  ErrorAlert,
  Spinner,
  TaskForm,
  TaskFormValues
};
use crate::session::use_session;

#[derive(Properties, PartialEq)]
pub struct EditTaskProps {
  pub id: AttrValue
}

#[function_component(EditTaskPage)]
pub fn edit_task_page(
  props: &EditTaskProps
) -> Html {
  let client = use_session().client();
  let navigator = use_navigator();
  let task = use_state(|| None::<TaskDto>);
  let error = use_state(|| None::<String>);
  let busy = use_state(|| false);

  {
    let task = task.clone();
    let error = error.clone();
    use_effect_with(
      (client.clone(), props.id.clone()),
      move |(client, id)| {
        let client = client.clone();
        let id = id.clone();
        wasm_bindgen_futures::spawn_local(
          async move {
            match client.get(&id).await {
              | Ok(found) => task.set(Some(found)),
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
          }
        );
        || ()
      }
    );
  }

  let on_submit = {
    let task = task.clone();
    let error = error.clone();
    let busy = busy.clone();
    Callback::from(
      move |values: TaskFormValues| {
        let Some(current) = (*task).clone()
        else {
          return;
        };
        let draft = match validate::task_draft(
          &values.name,
          &values.description
        ) {
          | Ok(draft) => draft,
          | Err(err) => {
            error.set(Some(err.to_string()));
            return;
          }
        };

        let updated =
          current.with_details(&draft);
        error.set(None);
        busy.set(true);
        let client = client.clone();
        let navigator = navigator.clone();
        let error = error.clone();
        let busy = busy.clone();
        wasm_bindgen_futures::spawn_local(
          async move {
            match client.update(&updated).await {
              | Ok(()) => {
                if let Some(navigator) =
                  &navigator
                {
                  navigator.push(
                    &Route::TaskDetail {
                      id: updated.id.clone()
                    }
                  );
                }
              }
              | Err(err) => {
                tracing::warn!(
                  task_id = %updated.id,
                  error = %err,
                  "task update failed"
                );
                error.set(Some(
                  UPDATE_TASK_FAILED
                    .to_string()
                ));
              }
            }
            busy.set(false);
          }
        );
      }
    )
  };

  let form = match &*task {
    | Some(task) => html! {
      <TaskForm
        key={task.id.clone()}
        initial={TaskFormValues {
          name:        task.name.clone(),
          description: task.description.clone()
        }}
        submit_label="Save"
        busy={*busy}
        {on_submit}
      />
    },
    | None if error.is_none() => html! {
      <Spinner label="Loading task..." />
    },
    | None => html! {}
  };

  html! {
    <section>
      <h2>{ "Edit Task" }</h2>
      <ErrorAlert message={(*error).clone()} />
      { form }
      <p>
        <Link<Route> to={Route::TaskDetail { id: props.id.to_string() }}>
          { "Cancel" }
        </Link<Route>>
      </p>
    </section>
  }
}
