use tasklet_shared::{
  CREATE_TASK_FAILED,
  TaskCreate,
  validate
};
use yew::{
  Callback,
  Html,
  function_component,
  html,
  use_state
};
use yew_router::prelude::{
  Link,
  use_navigator
};

use crate::app::Route;
use crate::components::{
  ErrorAlert,
  TaskForm,
  TaskFormValues
};
use crate::session::use_session;

#[function_component(AddTaskPage)]
pub fn add_task_page() -> Html {
  let client = use_session().client();
  let navigator = use_navigator();
  let error = use_state(|| None::<String>);
  let busy = use_state(|| false);

  let on_submit = {
    let error = error.clone();
    let busy = busy.clone();
    Callback::from(
      move |values: TaskFormValues| {
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

        let task = TaskCreate::from(draft);
        error.set(None);
        busy.set(true);
        let client = client.clone();
        let navigator = navigator.clone();
        let error = error.clone();
        let busy = busy.clone();
        wasm_bindgen_futures::spawn_local(
          async move {
            match client.create(&task).await {
              | Ok(()) => {
                tracing::info!(
                  name = %task.name,
                  "task created"
                );
                if let Some(navigator) =
                  &navigator
                {
                  navigator.push(&Route::Tasks);
                }
              }
              | Err(err) => {
                tracing::warn!(
                  error = %err,
                  "task create failed"
                );
                error.set(Some(
                  err.message_or(
                    CREATE_TASK_FAILED
                  )
                ));
              }
            }
            busy.set(false);
          }
        );
      }
    )
  };

  html! {
    <section>
      <h2>{ "Add Task" }</h2>
      <ErrorAlert message={(*error).clone()} />
      <TaskForm submit_label="Add Task" busy={*busy} {on_submit} />
      <p>
        <Link<Route> to={Route::Tasks}>{ "Back to tasks" }</Link<Route>>
      </p>
    </section>
  }
}
