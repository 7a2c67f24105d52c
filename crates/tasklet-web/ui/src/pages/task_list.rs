use futures_util::future::join_all;
use tasklet_shared::view::{
  FetchOutcome,
  StatusFilter,
  TaskListState
};
use tasklet_shared::{
  FETCH_TASK_FAILED,
  SEARCH_DEBOUNCE_MS,
  UPDATE_STATUS_FAILED
};
use yew::{
  Callback,
  Html,
  MouseEvent,
  function_component,
  html,
  use_effect_with,
  use_force_update,
  use_mut_ref,
  use_state
};
use yew_router::prelude::Link;

use crate::app::Route;
use crate::components::{
  ErrorAlert,
  FilterBar,
  Pagination,
  SearchBar,
  Spinner,
  TaskTile
};
use crate::hooks::use_debounce;
use crate::session::use_session;

#[function_component(TaskListPage)]
pub fn task_list_page() -> Html {
  let client = use_session().client();
  let state =
    use_mut_ref(TaskListState::default);
  let trigger = use_force_update();
  let raw_search = use_state(String::new);
  let search = use_debounce(
    (*raw_search).clone(),
    SEARCH_DEBOUNCE_MS as u32
  );
  let reload = use_state(|| 0_u32);
  let removing = use_state(|| false);
  let notice = use_state(|| None::<String>);

  let (page, page_size) = {
    let state = state.borrow();
    (state.page(), state.page_size())
  };

  {
    let state = state.clone();
    let trigger = trigger.clone();
    use_effect_with(
      (
        client.clone(),
        search,
        page,
        page_size,
        *reload
      ),
      move |(client, search, ..)| {
        let client = client.clone();
        let ticket = {
          let mut state = state.borrow_mut();
          state.set_search(search);
          client
            .has_token()
            .then(|| state.begin_fetch())
        };

        if let Some(ticket) = ticket {
          trigger.force_update();
          wasm_bindgen_futures::spawn_local(
            async move {
              let result = client
                .list(Some(&ticket.query))
                .await
                .map_err(|err| {
                  tracing::warn!(
                    error = %err,
                    request_id = ticket.id.get(),
                    "task list fetch failed"
                  );
                  FETCH_TASK_FAILED.to_string()
                });
              let outcome = state
                .borrow_mut()
                .finish_fetch(ticket.id, result);
              if outcome == FetchOutcome::Applied
              {
                trigger.force_update();
              }
            }
          );
        }

        || ()
      }
    );
  }

  let on_search = {
    let raw_search = raw_search.clone();
    Callback::from(move |text: String| {
      raw_search.set(text);
    })
  };

  let on_filter = {
    let state = state.clone();
    let trigger = trigger.clone();
    Callback::from(
      move |filter: StatusFilter| {
        state.borrow_mut().set_filter(filter);
        trigger.force_update();
      }
    )
  };

  let on_prev = {
    let state = state.clone();
    let trigger = trigger.clone();
    Callback::from(move |_: MouseEvent| {
      if state.borrow_mut().prev_page() {
        trigger.force_update();
      }
    })
  };

  let on_next = {
    let state = state.clone();
    let trigger = trigger.clone();
    Callback::from(move |_: MouseEvent| {
      if state.borrow_mut().next_page() {
        trigger.force_update();
      }
    })
  };

  let on_toggle = {
    let client = client.clone();
    let state = state.clone();
    let trigger = trigger.clone();
    let notice = notice.clone();
    Callback::from(move |id: String| {
      let Some(request) =
        state.borrow().toggle_request(&id)
      else {
        return;
      };
      let client = client.clone();
      let state = state.clone();
      let trigger = trigger.clone();
      let notice = notice.clone();
      wasm_bindgen_futures::spawn_local(
        async move {
          match client.update(&request).await {
            | Ok(()) => {
              state
                .borrow_mut()
                .apply_update(request);
              notice.set(None);
            }
            | Err(err) => {
              tracing::warn!(
                task_id = %request.id,
                error = %err,
                "status toggle failed"
              );
              notice.set(Some(
                UPDATE_STATUS_FAILED
                  .to_string()
              ));
            }
          }
          trigger.force_update();
        }
      );
    })
  };

  let on_remove_completed = {
    let client = client.clone();
    let removing = removing.clone();
    let reload = reload.clone();
    Callback::from(move |_: MouseEvent| {
      removing.set(true);
      let client = client.clone();
      let removing = removing.clone();
      let reload = reload.clone();
      wasm_bindgen_futures::spawn_local(
        async move {
          match client.list(None).await {
            | Ok(all) => {
              let completed: Vec<_> = all
                .into_iter()
                .filter(|task| task.status)
                .collect();
              let results = join_all(
                completed.iter().map(|task| {
                  client.delete(&task.id)
                })
              )
              .await;
              let mut failed = 0;
              for (task, result) in
                completed.iter().zip(results)
              {
                if let Err(err) = result {
                  failed += 1;
                  tracing::warn!(
                    task_id = %task.id,
                    error = %err,
                    "failed to remove completed task"
                  );
                }
              }
              tracing::info!(
                requested = completed.len(),
                failed,
                "removed completed tasks"
              );
            }
            | Err(err) => {
              tracing::warn!(
                error = %err,
                "could not list tasks to remove"
              );
            }
          }
          removing.set(false);
          reload.set(*reload + 1);
        }
      );
    })
  };

  let state = state.borrow();
  let signed_in = client.has_token();

  let body = if !signed_in {
    html! { <p>{ "Sign in to see your tasks." }</p> }
  } else if state.is_loading()
    && state.tasks().is_empty()
  {
    html! { <Spinner label="Loading tasks..." /> }
  } else if state.visible().is_empty() {
    html! { <p>{ "No tasks found." }</p> }
  } else {
    html! {
      <div class="tiles">
        {
          for state.visible().into_iter().map(|task| html! {
            <TaskTile
              key={task.id.clone()}
              task={task.clone()}
              on_toggle={on_toggle.clone()}
            />
          })
        }
      </div>
    }
  };

  html! {
    <section>
      <div class="toolbar">
        <SearchBar value={(*raw_search).clone()} on_input={on_search} />
        <Link<Route> to={Route::AddTask} classes="btn ok">{ "Add Task" }</Link<Route>>
        <button
          class="btn danger"
          disabled={*removing || !signed_in}
          onclick={on_remove_completed}
        >
          { "Remove Completed" }
        </button>
        <Link<Route> to={Route::Statistics} classes="btn">{ "View Statistics" }</Link<Route>>
      </div>
      <FilterBar active={state.filter()} on_select={on_filter} />
      {
        if *removing {
          html! { <Spinner label="Removing completed tasks..." /> }
        } else {
          html! {}
        }
      }
      <ErrorAlert message={state.error().map(str::to_string)} />
      <ErrorAlert message={(*notice).clone()} />
      { body }
      <Pagination
        page={state.page()}
        has_prev={state.has_prev()}
        has_more={state.has_more()}
        {on_prev}
        {on_next}
      />
    </section>
  }
}
