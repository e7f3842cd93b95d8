use leptos::prelude::*;

use crate::csv_ingest::CsvRow;

/// Preview table. Headers come from the first row; cells missing from a row
/// render empty. Nothing is rendered until rows exist.
#[component]
pub fn CsvTable(#[prop(into)] rows: Signal<Vec<CsvRow>>) -> impl IntoView {
	move || {
		rows.with(|rows| {
			let headers: Vec<String> = rows.first()?.keys().map(str::to_string).collect();

			let head = headers
				.iter()
				.map(|header| view! { <th>{header.clone()}</th> })
				.collect_view();
			let body = rows
				.iter()
				.map(|row| {
					let cells = headers
						.iter()
						.map(|header| {
							let value = row.get(header).unwrap_or_default().to_string();
							view! { <td>{value}</td> }
						})
						.collect_view();
					view! { <tr>{cells}</tr> }
				})
				.collect_view();

			Some(view! {
				<table class="csv-table">
					<thead>
						<tr>{head}</tr>
					</thead>
					<tbody>{body}</tbody>
				</table>
			})
		})
	}
}
