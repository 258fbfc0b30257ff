//! Sidebar next to the canvas: item palette, node editor and scenario controls.

use std::rc::Rc;

use leptos::prelude::*;
use leptos::task::spawn_local;
use web_sys::DragEvent;

use crate::editor::{
	DRAG_PAYLOAD_TYPE, EditorSession, LoadOutcome, NodeEdit, PaletteItem, ScenarioStore,
	ScenarioSync,
};

/// Scenario operations shared by the sidebar's controls.
pub type SharedSync = Rc<ScenarioSync<Box<dyn ScenarioStore>>>;

/// Draggable palette entries. Each drag carries the item as JSON.
#[component]
fn Palette(items: Vec<PaletteItem>) -> impl IntoView {
	let entries = items
		.into_iter()
		.map(|item| {
			let payload = serde_json::to_string(&item).unwrap_or_default();
			let label = item.label();
			let description = item.description.clone().unwrap_or_default();
			let on_dragstart = move |ev: DragEvent| {
				if let Some(dt) = ev.data_transfer() {
					let _ = dt.set_data(DRAG_PAYLOAD_TYPE, &payload);
					dt.set_effect_allowed("move");
				}
			};
			view! {
				<div class="palette-item" draggable="true" title=description on:dragstart=on_dragstart>
					{label}
				</div>
			}
		})
		.collect_view();

	view! {
		<section class="palette">
			<h2>"Elements"</h2>
			<p class="hint">"Drag an element onto the canvas."</p>
			{entries}
		</section>
	}
}

/// Edits the selected node. Submitting routes the form through the session's
/// selection; a stale selection is ignored there.
#[component]
fn NodeEditor(session: RwSignal<EditorSession>) -> impl IntoView {
	let selected = Memo::new(move |_| {
		session.with(|s| {
			s.selection()
				.selected_node_id()
				.cloned()
				.zip(s.selection().selected_node_data().cloned())
		})
	});

	let name = RwSignal::new(String::new());
	let item_type = RwSignal::new(String::new());
	let image = RwSignal::new(String::new());
	let description = RwSignal::new(String::new());
	let notes = RwSignal::new(String::new());

	Effect::new(move |_| {
		if let Some((_, data)) = selected.get() {
			let form = NodeEdit::from_data(&data);
			name.set(form.name);
			item_type.set(form.item_type);
			image.set(form.image);
			description.set(form.description);
			notes.set(form.notes);
		}
	});

	let on_submit = move |ev: leptos::ev::SubmitEvent| {
		ev.prevent_default();
		let edit = NodeEdit {
			name: name.get_untracked(),
			image: image.get_untracked(),
			description: description.get_untracked(),
			notes: notes.get_untracked(),
			item_type: item_type.get_untracked(),
		};
		session.update(|s| {
			s.update_selected(edit);
		});
	};

	let on_delete = move |_: leptos::ev::MouseEvent| {
		session.update(|s| {
			if let Some(id) = s.selection().selected_node_id().cloned() {
				s.delete_node(&id);
			}
		});
	};

	let field = move |label: &'static str, value: RwSignal<String>| {
		view! {
			<label>
				{label}
				<input
					type="text"
					prop:value=move || value.get()
					on:input=move |ev| value.set(event_target_value(&ev))
				/>
			</label>
		}
	};

	view! {
		<section class="node-editor">
			<h2>"Node"</h2>
			<Show
				when=move || selected.with(Option::is_some)
				fallback=|| view! { <p class="hint">"Click a node to edit it."</p> }
			>
				<p class="node-id">
					{move || selected.with(|s| s.as_ref().map(|(id, _)| id.to_string()).unwrap_or_default())}
				</p>
				<form on:submit=on_submit>
					{field("Name", name)}
					{field("Type", item_type)}
					{field("Image", image)}
					{field("Description", description)}
					<label>
						"Notes"
						<textarea
							prop:value=move || notes.get()
							on:input=move |ev| notes.set(event_target_value(&ev))
						/>
					</label>
					<div class="actions">
						<button type="submit">"Apply"</button>
						<button type="button" class="danger" on:click=on_delete>
							"Delete node"
						</button>
					</div>
				</form>
			</Show>
		</section>
	}
}

/// Save / load / update of the whole graph.
#[component]
fn ScenarioControls(session: RwSignal<EditorSession>, sync: SharedSync) -> impl IntoView {
	let scenario_name = RwSignal::new(String::new());
	let status = RwSignal::new(String::new());
	let busy = RwSignal::new(false);

	let sync_save = sync.clone();
	let on_save = move |_: leptos::ev::MouseEvent| {
		let name = scenario_name.get_untracked().trim().to_string();
		if name.is_empty() {
			status.set("Enter a scenario name first.".into());
			return;
		}
		let snapshot = session.with_untracked(|s| s.snapshot());
		let sync = sync_save.clone();
		busy.set(true);
		spawn_local(async move {
			match sync.save(&name, snapshot).await {
				Ok(saved) => {
					session.update(|s| s.record_saved(&saved));
					status.set(format!("Saved \"{name}\" (id {}).", saved.id));
				}
				Err(e) => status.set(format!("Save failed: {e}")),
			}
			busy.set(false);
		});
	};

	let sync_load = sync.clone();
	let on_load = move |_: leptos::ev::MouseEvent| {
		let name = scenario_name.get_untracked().trim().to_string();
		let sync = sync_load.clone();
		busy.set(true);
		spawn_local(async move {
			match sync.load(&name).await {
				Ok(LoadOutcome::Found(loaded)) => {
					let id = loaded.scenario_id.clone();
					session.update(|s| s.apply_loaded(loaded));
					status.set(format!("Loaded \"{name}\" (id {id})."));
				}
				Ok(LoadOutcome::NotFound) => status.set(format!("No scenario named \"{name}\".")),
				Err(e) => status.set(format!("Load failed: {e}")),
			}
			busy.set(false);
		});
	};

	let sync_update = sync;
	let on_update = move |_: leptos::ev::MouseEvent| {
		let (id, snapshot) = session.with_untracked(|s| (s.scenario_id().cloned(), s.snapshot()));
		let sync = sync_update.clone();
		busy.set(true);
		spawn_local(async move {
			match sync.update(id.as_ref(), snapshot).await {
				Ok(_) => status.set("Scenario updated.".into()),
				Err(e) => status.set(format!("Update failed: {e}")),
			}
			busy.set(false);
		});
	};

	view! {
		<section class="scenario-controls">
			<h2>"Scenario"</h2>
			<input
				type="text"
				placeholder="Scenario name"
				prop:value=move || scenario_name.get()
				on:input=move |ev| scenario_name.set(event_target_value(&ev))
			/>
			<div class="actions">
				<button on:click=on_save disabled=move || busy.get()>"Save"</button>
				<button on:click=on_load disabled=move || busy.get()>"Load"</button>
				<button
					on:click=on_update
					disabled=move || busy.get() || session.with(|s| s.scenario_id().is_none())
				>
					"Update"
				</button>
			</div>
			<p class="current">
				{move || {
					session
						.with(|s| s.scenario_id().map(|id| format!("Current scenario id: {id}")))
						.unwrap_or_else(|| "Not saved yet.".into())
				}}
			</p>
			<p class="status">{move || status.get()}</p>
		</section>
	}
}

/// Palette, node editor and scenario controls stacked in one column.
#[component]
pub fn Sidebar(
	session: RwSignal<EditorSession>,
	sync: SharedSync,
	palette: Vec<PaletteItem>,
) -> impl IntoView {
	view! {
		<aside class="sidebar">
			<Palette items=palette />
			<NodeEditor session=session />
			<ScenarioControls session=session sync=sync />
		</aside>
	}
}
