use leptos::ev::Event;
use leptos::prelude::*;
use leptos::task::spawn_local;
use web_sys::{File, HtmlInputElement};

use crate::api::ApiClient;
use crate::components::FileStoreSignal;
use crate::components::file_card::FileCard;
use crate::config::ApiConfig;
use crate::store::FileStore;
use crate::{csv_ingest, upload};

fn selected_files(ev: &Event) -> Vec<(String, File)> {
	let input = event_target::<HtmlInputElement>(ev);
	let Some(list) = input.files() else {
		return Vec::new();
	};
	(0..list.length())
		.filter_map(|i| list.get(i))
		.map(|file| (file.name(), file))
		.collect()
}

/// Uploader page: file picker, upload button, status line and one card per file.
#[component]
pub fn Home() -> impl IntoView {
	let store: FileStoreSignal = RwSignal::new_local(FileStore::default());
	let api = StoredValue::new(ApiClient::new(ApiConfig::from_document()));

	let on_change = move |ev: Event| {
		let files = selected_files(&ev);
		let Some(targets) = store.try_update(|s| s.select_files(files)) else {
			return;
		};
		// Each parse lands independently and finds its record by id.
		for (id, file) in targets {
			spawn_local(async move {
				let parsed = csv_ingest::read_and_parse(file).await;
				store.update(|s| s.record_parsed(id, parsed));
			});
		}
	};

	let on_upload = move |_| {
		let Some(targets) = store.try_update(|s| s.begin_upload()).flatten() else {
			return;
		};
		let client = api.get_value();
		spawn_local(async move {
			let report = upload::dispatch(targets, |file| {
				let client = client.clone();
				async move { client.upload_csv(file).await }
			})
			.await;
			store.update(|s| s.apply_upload_report(&report));
		});
	};

	let status = move || store.with(|s| s.status().to_string());

	view! {
		<div class="App">
			<header class="App-header">
				<h1>"Upload Multiple CSVs to Visualize Dynamic Network Graph"</h1>
				<input type="file" accept=".csv" multiple=true on:change=on_change />
				<button on:click=on_upload>"Upload"</button>
				<Show when=move || !status().is_empty()>
					<p class="status">{status}</p>
				</Show>
			</header>
			<div class="file-container">
				<For
					each=move || store.with(|s| s.ids())
					key=|id| *id
					children=move |id| view! { <FileCard id=id store=store api=api /> }
				/>
			</div>
			<footer>
				<p>"© 2024 Hash Agile. All Rights Reserved."</p>
			</footer>
		</div>
	}
}
