//! Insight sidebar: selected-node details plus the generated traffic
//! analysis.
//!
//! The sidebar is a plain projection of three signals. It renders the
//! selection header (or a hint when nothing is selected), then the analysis
//! area in one of three states: skeleton bars while a request is in flight,
//! the formatted analysis text, or a placeholder before the first result.

use leptos::prelude::*;

use super::arch_graph::theme::kind_style;
use super::arch_graph::ArchNode;

/// Sidebar panel beside the diagram.
#[component]
pub fn InfoSidebar(
	/// Node whose details are shown; `None` renders the idle hint.
	#[prop(into)]
	selected: Signal<Option<ArchNode>>,
	/// Analysis text to render; empty shows the placeholder.
	#[prop(into)]
	explanation: Signal<String>,
	/// True while an analysis request is in flight.
	#[prop(into)]
	loading: Signal<bool>,
	/// Invoked when the user dismisses the selection.
	#[prop(into)]
	on_clear: Callback<()>,
) -> impl IntoView {
	view! {
		<div class="sidebar">
			{move || match selected.get() {
				Some(node) => {
					let kind_name = kind_style(node.kind).name;
					view! {
						<div class="sidebar-header">
							<div class="sidebar-title-row">
								<h2>{node.name.clone()}</h2>
								<button class="close-button" on:click=move |_| on_clear.run(())>
									"\u{2715}"
								</button>
							</div>
							<span class="kind-chip">{kind_name}</span>
							<p class="node-description">{format!("\"{}\"", node.description)}</p>
						</div>
					}
						.into_any()
				}
				None => {
					view! {
						<div class="sidebar-header">
							<h2>"System Insight"</h2>
							<p class="sidebar-hint">
								"Select a node in the diagram to explore technical traffic flows and security considerations."
							</p>
						</div>
					}
						.into_any()
				}
			}}

			<hr class="sidebar-rule" />

			<div class="analysis">
				<div class="analysis-header">
					<h3>"Gemini Architect Analysis"</h3>
					{move || loading.get().then(|| view! { <div class="spinner"></div> })}
				</div>
				{move || {
					if loading.get() {
						view! {
							<div class="skeleton">
								<div class="skeleton-bar" style="width: 75%"></div>
								<div class="skeleton-bar" style="width: 100%"></div>
								<div class="skeleton-bar" style="width: 83%"></div>
								<div class="skeleton-bar" style="width: 66%"></div>
							</div>
						}
							.into_any()
					} else {
						let text = explanation.get();
						if text.is_empty() {
							view! {
								<div class="analysis-empty">
									<p>"The AI architect is ready to explain the infrastructure."</p>
								</div>
							}
								.into_any()
						} else {
							view! { <div class="analysis-body">{render_analysis(&text)}</div> }
								.into_any()
						}
					}
				}}
			</div>

			<div class="sidebar-footer">
				<p>"Powered by Gemini 3 Pro & Cloud Architecture Insights"</p>
			</div>
		</div>
	}
}

/// Line-oriented rendering of the model's Markdown-flavored output.
/// Headings and bullets become their own elements; every other line is a
/// paragraph, blank lines included so spacing survives.
fn render_analysis(text: &str) -> impl IntoView {
	text.lines()
		.map(|line| {
			if line.starts_with('#') {
				view! { <h4>{heading_text(line).to_string()}</h4> }.into_any()
			} else if line.starts_with('-') || line.starts_with('*') {
				let item = line
					.strip_prefix("- ")
					.or_else(|| line.strip_prefix("* "))
					.unwrap_or(line);
				view! { <li>{item.to_string()}</li> }.into_any()
			} else {
				view! { <p>{line.to_string()}</p> }.into_any()
			}
		})
		.collect_view()
}

/// Strip the leading hashes from a heading line. Hashes not followed by a
/// space are left alone, matching the loose formatting the model emits.
fn heading_text(line: &str) -> &str {
	let trimmed = line.trim_start_matches('#');
	match trimmed.strip_prefix(' ') {
		Some(rest) => rest,
		None => line,
	}
}

#[cfg(test)]
mod tests {
	use super::heading_text;

	#[test]
	fn headings_drop_hashes_only_with_a_space() {
		assert_eq!(heading_text("# Traffic Flow"), "Traffic Flow");
		assert_eq!(heading_text("### Security"), "Security");
		assert_eq!(heading_text("#NoSpace"), "#NoSpace");
	}
}
