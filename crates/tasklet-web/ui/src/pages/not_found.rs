use yew::{
  Html,
  function_component,
  html
};
use yew_router::prelude::Link;

use crate::app::Route;

#[function_component(NotFoundPage)]
pub fn not_found_page() -> Html {
  html! {
    <section class="panel">
      <h2>{ "Page not found" }</h2>
      <Link<Route> to={Route::Tasks}>{ "Back to tasks" }</Link<Route>>
    </section>
  }
}
