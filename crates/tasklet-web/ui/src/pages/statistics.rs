use tasklet_shared::FETCH_TASK_FAILED;
use tasklet_shared::stats::TaskStats;
use yew::{
  Html,
  function_component,
  html,
  use_effect_with,
  use_state
};
use yew_router::prelude::Link;

use crate::app::Route;
use crate::components::{
  ErrorAlert,
  Spinner
};
use crate::session::use_session;

fn bar_width(percent: f64) -> String {
  format!("width:{:.2}%", percent.clamp(0.0, 100.0))
}

#[function_component(StatisticsPage)]
pub fn statistics_page() -> Html {
  let client = use_session().client();
  let signed_in = client.has_token();
  let stats = use_state(|| None::<TaskStats>);
  let error = use_state(|| None::<String>);

  {
    let stats = stats.clone();
    let error = error.clone();
    use_effect_with(client, move |client| {
      let client = client.clone();
      if client.has_token() {
        wasm_bindgen_futures::spawn_local(
          async move {
            match client.list(None).await {
              | Ok(tasks) => {
                stats.set(Some(
                  TaskStats::from_tasks(&tasks)
                ));
              }
              | Err(err) => {
                tracing::warn!(
                  error = %err,
                  "statistics fetch failed"
                );
                error.set(Some(
                  FETCH_TASK_FAILED.to_string()
                ));
              }
            }
          }
        );
      }
      || ()
    });
  }

  let body = match &*stats {
    | Some(stats) => html! {
      <div class="panel">
        <p>{ format!("Total tasks: {}", stats.total) }</p>
        <p>{ format!("Completed: {}", stats.completed_label()) }</p>
        <p>{ format!("Active: {}", stats.active_label()) }</p>
        <div class="bar">
          <div class="completed" style={bar_width(stats.completed_percent)}></div>
          <div class="active" style={bar_width(stats.active_percent)}></div>
        </div>
      </div>
    },
    | None if !signed_in => html! {
      <p>{ "Sign in to see your tasks." }</p>
    },
    | None if error.is_none() => html! {
      <Spinner label="Loading statistics..." />
    },
    | None => html! {}
  };

  html! {
    <section>
      <h2>{ "Statistics" }</h2>
      <ErrorAlert message={(*error).clone()} />
      { body }
      <p>
        <Link<Route> to={Route::Tasks}>{ "Back to tasks" }</Link<Route>>
      </p>
    </section>
  }
}
