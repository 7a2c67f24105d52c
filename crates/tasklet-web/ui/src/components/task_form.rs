use tasklet_shared::{
  DESCRIPTION_MAX_CHARS,
  NAME_MAX_CHARS
};
use web_sys::{
  HtmlInputElement,
  HtmlTextAreaElement
};
use yew::{
  AttrValue,
  Callback,
  Html,
  InputEvent,
  Properties,
  SubmitEvent,
  TargetCast,
  function_component,
  html,
  use_state
};

#[derive(Clone, Default, PartialEq)]
pub struct TaskFormValues {
  pub name:        String,
  pub description: String
}

#[derive(Properties, PartialEq)]
pub struct TaskFormProps {
  #[prop_or_default]
  pub initial:      TaskFormValues,
  pub submit_label: AttrValue,
  #[prop_or_default]
  pub busy:         bool,
  pub on_submit:    Callback<TaskFormValues>
}

/// Name and description inputs shared by
/// the add and edit pages. Values are
/// sent untrimmed; the page validates.
#[function_component(TaskForm)]
pub fn task_form(
  props: &TaskFormProps
) -> Html {
  let name = use_state(|| {
    props.initial.name.clone()
  });
  let description = use_state(|| {
    props.initial.description.clone()
  });

  let on_name = {
    let name = name.clone();
    Callback::from(move |e: InputEvent| {
      let input: HtmlInputElement =
        e.target_unchecked_into();
      name.set(input.value());
    })
  };

  let on_description = {
    let description = description.clone();
    Callback::from(move |e: InputEvent| {
      let input: HtmlTextAreaElement =
        e.target_unchecked_into();
      description.set(input.value());
    })
  };

  let onsubmit = {
    let name = name.clone();
    let description = description.clone();
    let on_submit = props.on_submit.clone();
    Callback::from(move |e: SubmitEvent| {
      e.prevent_default();
      on_submit.emit(TaskFormValues {
        name:        (*name).clone(),
        description: (*description).clone()
      });
    })
  };

  html! {
    <form class="panel" {onsubmit}>
      <div class="field">
        <label for="task-name">{ "Name" }</label>
        <input
          id="task-name"
          type="text"
          maxlength={NAME_MAX_CHARS.to_string()}
          value={(*name).clone()}
          oninput={on_name}
        />
      </div>
      <div class="field">
        <label for="task-description">{ "Description" }</label>
        <textarea
          id="task-description"
          maxlength={DESCRIPTION_MAX_CHARS.to_string()}
          value={(*description).clone()}
          oninput={on_description}
        />
      </div>
      <button class="btn ok" type="submit" disabled={props.busy}>
        { props.submit_label.clone() }
      </button>
    </form>
  }
}
