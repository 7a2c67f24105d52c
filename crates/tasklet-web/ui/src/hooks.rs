use gloo::timers::callback::Timeout;
use yew::{
  hook,
  use_effect_with,
  use_state_eq
};

/// Returns `value` once it has stayed
/// unchanged for `delay_ms`. Every change
/// drops the pending timeout, as does
/// unmounting.
#[hook]
pub fn use_debounce<T>(
  value: T,
  delay_ms: u32
) -> T
where
  T: Clone + PartialEq + 'static
{
  let settled =
    use_state_eq(|| value.clone());

  {
    let settled = settled.clone();
    use_effect_with(
      value,
      move |value| {
        let value = value.clone();
        let pending = if delay_ms == 0 {
          settled.set(value);
          None
        } else {
          Some(Timeout::new(
            delay_ms,
            move || settled.set(value)
          ))
        };

        move || drop(pending)
      }
    );
  }

  (*settled).clone()
}
