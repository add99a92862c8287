use leptos::prelude::*;
use leptos_router::hooks::use_query_map;
use log::warn;

use crate::components::chord::{ChordDiagram, Step};
use crate::config::StorageConfig;
use crate::data::load_all_data;

/// Step named by `?step=`, if it names one.
fn step_from_query(raw: Option<String>) -> Option<Step> {
	match raw?.parse::<Step>() {
		Ok(step) => Some(step),
		Err(err) => {
			warn!("Ignoring {err}");
			None
		}
	}
}

/// Default Home Page
#[component]
pub fn Home() -> impl IntoView {
	let query = use_query_map();
	let initial = step_from_query(query.with_untracked(|q| q.get("step"))).unwrap_or(Step::Grayscale);
	let (step, set_step) = signal(initial);

	let data = LocalResource::new(|| async move { load_all_data(&StorageConfig::from_env()).await });

	let step_buttons = Step::ALL
		.into_iter()
		.map(|s| {
			view! {
				<button class="step-button" class:active=move || step.get() == s on:click=move |_| set_step.set(s)>
					{s.name()}
				</button>
			}
		})
		.collect_view();

	view! {
		<ErrorBoundary fallback=|errors| {
			view! {
				<h1>"Uh oh! Something went wrong!"</h1>

				<p>"Errors: "</p>
				<ul>
					{move || {
						errors
							.get()
							.into_iter()
							.map(|(_, e)| view! { <li>{e.to_string()}</li> })
							.collect_view()
					}}
				</ul>
			}
		}>

			<div class="chord-page">
				<nav class="step-selector">{step_buttons}</nav>
				<Suspense fallback=|| view! { <p class="loading">"Loading data…"</p> }>
					{move || Suspend::new(async move {
						data.await.map(|d| view! { <ChordDiagram data=d step=step /> })
					})}
				</Suspense>
			</div>
		</ErrorBoundary>
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn query_step_parsing() {
		assert_eq!(step_from_query(Some("sexist".into())), Some(Step::Sexist));
		assert_eq!(step_from_query(Some("finale".into())), None);
		assert_eq!(step_from_query(None), None);
	}
}
