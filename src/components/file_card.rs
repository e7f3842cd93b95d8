use leptos::prelude::*;
use leptos::task::spawn_local;
use log::info;

use super::FileStoreSignal;
use super::csv_table::CsvTable;
use super::force_graph::ForceGraphCanvas;
use crate::api::ApiClient;
use crate::chart::build_chart_options;
use crate::store::FileId;

/// One selected file: preview, graph controls and delete button.
#[component]
pub fn FileCard(id: FileId, store: FileStoreSignal, api: StoredValue<ApiClient>) -> impl IntoView {
	let name = move || store.with(|s| s.get(id).map(|r| r.name.clone()).unwrap_or_default());
	let rows = Signal::derive(move || {
		store.with(|s| s.get(id).map(|r| r.rows.clone()).unwrap_or_default())
	});
	let ready = move || store.with(|s| s.get(id).is_some_and(|r| r.visualize_ready));
	let has_graph = move || store.with(|s| s.get(id).is_some_and(|r| r.graph.is_some()));
	// Rebuilt from the edge list every time; nothing is cached.
	let chart = Signal::derive(move || {
		store.with(|s| {
			s.get(id)
				.and_then(|r| r.graph.as_deref())
				.map(build_chart_options)
				.unwrap_or_default()
		})
	});

	let on_visualize = move |_| {
		let Some(target) = store.with_untracked(|s| s.graph_target(id)) else {
			return;
		};
		info!("fetching graph for {}", target);
		let client = api.get_value();
		spawn_local(async move {
			let result = client.network_data().await;
			store.update(|s| s.attach_graph(target, result));
		});
	};

	let on_delete = move |_| {
		store.update(|s| {
			if let Some(index) = s.position_of(id) {
				s.delete_file(index);
			}
		});
	};

	view! {
		<div class="file-data">
			<h3>{name}</h3>
			<CsvTable rows=rows />
			<Show when=ready>
				<div>
					<button on:click=on_visualize>"Visualize Graph"</button>
					<Show when=has_graph>
						<ForceGraphCanvas options=chart />
					</Show>
				</div>
			</Show>
			<button on:click=on_delete>"Delete File"</button>
		</div>
	}
}
