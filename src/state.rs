use std::collections::BTreeSet;
use std::path::Path;

use crate::config::Settings;
use crate::dashboard::{render, DashboardView, Inputs};
use crate::data::error::LoadError;
use crate::data::export::export_file;
use crate::data::loader::Loader;
use crate::data::source::{DataSource, FileSource, HttpSource};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub settings: Settings,

    /// Current source plus its per-row-limit cache.
    pub loader: Option<Loader<Box<dyn DataSource>>>,

    /// Control values as edited in the side panel.
    pub inputs: Inputs,

    /// Last successful view (None before the first load or after an error).
    pub view: Option<DashboardView>,

    /// Inputs the current `view` (or error) was produced from.
    rendered_inputs: Option<Inputs>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,

    /// Outcome of the last export, kept apart from load errors.
    pub export_message: Option<String>,
}

impl AppState {
    pub fn new(settings: Settings) -> Self {
        let mut state = Self {
            settings,
            loader: None,
            inputs: Inputs::default(),
            view: None,
            rendered_inputs: None,
            status_message: None,
            export_message: None,
        };
        state.use_remote_source();
        state
    }

    /// Point the loader at the configured remote URL, with a fresh cache.
    pub fn use_remote_source(&mut self) {
        let source = HttpSource::new(self.settings.data_url.clone()).map(|src| Box::new(src) as Box<dyn DataSource>);
        self.replace_source(source);
    }

    /// Point the loader at a local CSV / CSV.gz file, with a fresh cache.
    pub fn use_file_source(&mut self, path: &Path) {
        self.set_source(Box::new(FileSource::new(path)));
    }

    /// Install `source`, or drop the current loader if it could not be built.
    fn replace_source(&mut self, source: Result<Box<dyn DataSource>, LoadError>) {
        match source {
            Ok(source) => self.set_source(source),
            Err(e) => {
                self.loader = None;
                self.rendered_inputs = None;
                self.fail(e);
            }
        }
    }

    fn set_source(&mut self, source: Box<dyn DataSource>) {
        log::info!("Using data source {}", source.describe());
        self.loader = Some(Loader::new(source));
        self.view = None;
        self.rendered_inputs = None;
        self.status_message = None;
    }

    /// Re-render when the inputs changed since the last render.
    pub fn refresh(&mut self) {
        if self.rendered_inputs.as_ref() == Some(&self.inputs) {
            return;
        }
        let Some(loader) = self.loader.as_mut() else {
            return;
        };
        self.rendered_inputs = Some(self.inputs.clone());

        match render(loader, &self.inputs, self.view.as_ref()) {
            Ok(view) => {
                self.view = Some(view);
                self.status_message = None;
            }
            Err(e) => self.fail(e),
        }
    }

    /// Render again on the next refresh even if the inputs are unchanged.
    pub fn retry(&mut self) {
        self.rendered_inputs = None;
    }

    /// Write the filtered rows of the current view to `path`.
    pub fn export_to(&mut self, path: &Path) {
        let Some(view) = &self.view else {
            return;
        };
        self.export_message = match export_file(path, view.filtered_records()) {
            Ok(_) => None,
            Err(e) => {
                log::error!("Failed to export: {e:#}");
                Some(format!("Export failed: {e:#}"))
            }
        };
    }

    fn fail(&mut self, e: LoadError) {
        log::error!("Failed to load dataset: {e}");
        self.view = None;
        self.status_message = Some(format!("Error: {e}"));
    }

    /// Base selection as shown in the multi-select: explicit, or every base
    /// of the loaded dataset.
    pub fn selected_bases(&self) -> BTreeSet<String> {
        match (&self.inputs.bases, &self.view) {
            (Some(bases), _) => bases.clone(),
            (None, Some(view)) => view.dataset.bases.clone(),
            (None, None) => BTreeSet::new(),
        }
    }

    /// Toggle a single base in the selection.
    pub fn toggle_base(&mut self, base: &str) {
        let mut selected = self.selected_bases();
        if !selected.remove(base) {
            selected.insert(base.to_string());
        }
        self.inputs.bases = Some(selected);
    }

    /// Select every base (back to the default).
    pub fn select_all(&mut self) {
        self.inputs.bases = None;
    }

    /// Deselect every base.
    pub fn select_none(&mut self) {
        self.inputs.bases = Some(BTreeSet::new());
    }
}
