//! The execution engine.

use super::trace::{render_cards, StageRecord};
use super::{AttributeStore, PipelineOptions};
use crate::config;
use crate::core::{PipelineState, SharedObject, StageStatus, Value};
use crate::errors::{AttributeNotFoundError, ForgeError, InvalidStateError};
use crate::events::{
    EventSink, NoOpEventSink, PIPELINE_COMPLETED, PIPELINE_FAILED, PIPELINE_STARTED,
    STAGE_COMPLETED, STAGE_FAILED, STAGE_STARTED,
};
use crate::registry::Registry;
use crate::resolve::{Resolver, Scope};
use crate::stages::{normalize_all, RawStage, Stage};
use crate::utils::{generate_run_id, generate_stage_id, now_utc};
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// An ordered list of stages executed against a host object and a store.
///
/// Stages are added while the pipeline is idle and executed strictly in
/// order by [`run`](Self::run). The first failing stage stops the run;
/// results already stored are kept.
pub struct Pipeline {
    stages: Vec<Stage>,
    stage_ids: Vec<String>,
    host: Option<SharedObject>,
    store: AttributeStore,
    registry: Registry,
    options: PipelineOptions,
    sink: Arc<dyn EventSink>,
    state: PipelineState,
    history: Vec<StageRecord>,
    run_id: Option<Uuid>,
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl Pipeline {
    /// Creates an empty pipeline with no host.
    #[must_use]
    pub fn new() -> Self {
        Self {
            stages: Vec::new(),
            stage_ids: Vec::new(),
            host: None,
            store: AttributeStore::new(),
            registry: Registry::new(),
            options: PipelineOptions::default(),
            sink: Arc::new(NoOpEventSink),
            state: PipelineState::Idle,
            history: Vec::new(),
            run_id: None,
        }
    }

    /// Sets the host object whose methods and attributes stages use.
    #[must_use]
    pub fn with_host(mut self, host: SharedObject) -> Self {
        self.host = Some(host);
        self
    }

    /// Sets the registry of free functions and types.
    #[must_use]
    pub fn with_registry(mut self, registry: Registry) -> Self {
        self.registry = registry;
        self
    }

    /// Sets the options.
    #[must_use]
    pub fn with_options(mut self, options: PipelineOptions) -> Self {
        self.options = options;
        self
    }

    /// Sets the event sink.
    #[must_use]
    pub fn with_event_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Appends stages to the list.
    ///
    /// Every declaration is normalized before any is added, so a malformed
    /// entry leaves the list unchanged.
    ///
    /// # Errors
    ///
    /// Returns `MalformedStage` for a bad declaration or `InvalidState` if
    /// the pipeline has already run.
    pub fn add_stages<I, R>(&mut self, raws: I) -> Result<&mut Self, ForgeError>
    where
        I: IntoIterator<Item = R>,
        R: Into<RawStage>,
    {
        self.ensure_idle("add stages")?;
        let offset = self.stages.len();
        let stages = normalize_all(raws).map_err(|err| match err.position {
            Some(position) => err.at(offset + position),
            None => err,
        })?;
        self.push_stages(stages);
        Ok(self)
    }

    /// Replaces the stage list.
    ///
    /// # Errors
    ///
    /// Returns `MalformedStage` for a bad declaration or `InvalidState` if
    /// the pipeline has already run.
    pub fn from_list<I, R>(&mut self, raws: I) -> Result<&mut Self, ForgeError>
    where
        I: IntoIterator<Item = R>,
        R: Into<RawStage>,
    {
        self.ensure_idle("replace stages")?;
        let stages = normalize_all(raws)?;
        self.clear_stages();
        self.push_stages(stages);
        Ok(self)
    }

    /// Replaces the stage list with the stages of a JSON or YAML file.
    ///
    /// Class names in the file are looked up among the registry's types.
    ///
    /// # Errors
    ///
    /// Returns `Config`, `Io`, `MalformedStage` or `UnresolvedTarget` if the
    /// file cannot be turned into stages, or `InvalidState` if the pipeline
    /// has already run.
    pub fn from_config(&mut self, path: impl AsRef<Path>) -> Result<&mut Self, ForgeError> {
        self.ensure_idle("load stages")?;
        let stages = config::load_stages(path, &self.registry)?;
        self.clear_stages();
        self.push_stages(stages);
        Ok(self)
    }

    /// Runs every stage in order.
    ///
    /// # Errors
    ///
    /// Returns the first stage failure, with the stage position attached.
    /// The pipeline is then in the `Failed` state.
    pub fn run(&mut self) -> Result<&mut Self, ForgeError> {
        let run_id = generate_run_id();
        self.run_id = Some(run_id);
        self.history.clear();
        self.state = PipelineState::Running;

        info!(
            run_id = %run_id,
            description = %self.options.description,
            stages = self.stages.len(),
            "Pipeline started"
        );
        self.sink.emit(
            PIPELINE_STARTED,
            Some(serde_json::json!({
                "run_id": run_id.to_string(),
                "description": self.options.description,
                "stages": self.stages.len(),
            })),
        );

        let start = Instant::now();
        let registry = self.registry.layered_with_host(self.host.as_ref());
        let stages: Vec<(String, Stage)> = self
            .stage_ids
            .iter()
            .cloned()
            .zip(self.stages.iter().cloned())
            .collect();

        for (position, (id, stage)) in stages.iter().enumerate() {
            if let Err(err) = self.execute_stage(&registry, position, id, stage) {
                let duration_ms = start.elapsed().as_secs_f64() * 1000.0;
                self.state = PipelineState::Failed;
                warn!(run_id = %run_id, position, error = %err, "Pipeline failed");
                self.sink.emit(
                    PIPELINE_FAILED,
                    Some(serde_json::json!({
                        "run_id": run_id.to_string(),
                        "position": position,
                        "error": err.to_dict(),
                        "duration_ms": duration_ms,
                    })),
                );
                return Err(err);
            }
        }

        let duration_ms = start.elapsed().as_secs_f64() * 1000.0;
        self.state = PipelineState::Completed;
        info!(run_id = %run_id, duration_ms, "Pipeline completed");
        self.sink.emit(
            PIPELINE_COMPLETED,
            Some(serde_json::json!({
                "run_id": run_id.to_string(),
                "stages": self.history.len(),
                "duration_ms": duration_ms,
            })),
        );
        Ok(self)
    }

    /// Reads a stored attribute: from the host first, then the store.
    ///
    /// # Errors
    ///
    /// Returns `AttributeNotFound` if neither holds the name.
    pub fn get_attribute(&self, name: &str) -> Result<Value, ForgeError> {
        self.scope()
            .lookup(name)
            .ok_or_else(|| AttributeNotFoundError::new(name).into())
    }

    /// Returns the canonical stages in execution order.
    #[must_use]
    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    /// Returns the stage identifiers, parallel to [`stages`](Self::stages).
    #[must_use]
    pub fn stage_ids(&self) -> &[String] {
        &self.stage_ids
    }

    /// Returns the lifecycle state.
    #[must_use]
    pub const fn state(&self) -> PipelineState {
        self.state
    }

    /// Returns the internal store.
    #[must_use]
    pub const fn store(&self) -> &AttributeStore {
        &self.store
    }

    /// Returns the records of the last run.
    #[must_use]
    pub fn history(&self) -> &[StageRecord] {
        &self.history
    }

    /// Returns the identifier of the last run.
    #[must_use]
    pub const fn run_id(&self) -> Option<Uuid> {
        self.run_id
    }

    /// Returns the host object, if any.
    #[must_use]
    pub const fn host(&self) -> Option<&SharedObject> {
        self.host.as_ref()
    }

    /// Returns the registry.
    #[must_use]
    pub const fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Returns the options.
    #[must_use]
    pub const fn options(&self) -> &PipelineOptions {
        &self.options
    }

    /// Renders the stage list as cards joined by arrows.
    #[must_use]
    pub fn render(&self) -> String {
        render_cards(self.stage_ids.iter().map(String::as_str).zip(&self.stages))
    }

    fn scope(&self) -> Scope<'_> {
        Scope::new(self.host.as_ref(), &self.store)
    }

    fn ensure_idle(&self, operation: &str) -> Result<(), InvalidStateError> {
        if self.state == PipelineState::Idle {
            Ok(())
        } else {
            Err(InvalidStateError::new(operation, self.state))
        }
    }

    fn push_stages(&mut self, stages: Vec<Stage>) {
        for stage in stages {
            self.stage_ids.push(generate_stage_id());
            self.stages.push(stage);
        }
    }

    fn clear_stages(&mut self) {
        self.stages.clear();
        self.stage_ids.clear();
    }

    fn execute_stage(
        &mut self,
        registry: &Registry,
        position: usize,
        id: &str,
        stage: &Stage,
    ) -> Result<(), ForgeError> {
        let label = stage.label();
        if self.options.verbose {
            info!(position, id = %id, stage = %label, "Running stage");
        } else {
            debug!(position, id = %id, stage = %label, "Running stage");
        }
        self.sink.emit(
            STAGE_STARTED,
            Some(serde_json::json!({"position": position, "id": id, "stage": label})),
        );

        let started_at = now_utc();
        let start = Instant::now();
        let result = self.invoke(registry, stage).map_err(|err| err.at(position));
        let duration_ms = start.elapsed().as_secs_f64() * 1000.0;

        match result {
            Ok(value) => {
                if let Some(name) = stage.attribute_name() {
                    self.store_result(name, value);
                }
                if self.options.verbose {
                    info!(position, id = %id, duration_ms, "Stage completed");
                } else {
                    debug!(position, id = %id, duration_ms, "Stage completed");
                }
                self.sink.emit(
                    STAGE_COMPLETED,
                    Some(serde_json::json!({
                        "position": position,
                        "id": id,
                        "stage": label,
                        "duration_ms": duration_ms,
                    })),
                );
                self.history.push(StageRecord {
                    position,
                    id: id.to_string(),
                    stage: label,
                    status: StageStatus::Ok,
                    started_at,
                    duration_ms,
                    error: None,
                });
                Ok(())
            }
            Err(err) => {
                warn!(position, id = %id, stage = %label, error = %err, "Stage failed");
                self.sink.emit(
                    STAGE_FAILED,
                    Some(serde_json::json!({
                        "position": position,
                        "id": id,
                        "stage": label,
                        "error": err.to_string(),
                        "kind": err.kind(),
                        "duration_ms": duration_ms,
                    })),
                );
                self.history.push(StageRecord {
                    position,
                    id: id.to_string(),
                    stage: label,
                    status: StageStatus::Fail,
                    started_at,
                    duration_ms,
                    error: Some(err.to_string()),
                });
                Err(err)
            }
        }
    }

    fn invoke(&self, registry: &Registry, stage: &Stage) -> Result<Value, ForgeError> {
        let resolver = Resolver::new(registry, self.scope(), self.options.argument_mode);
        let callable = resolver.resolve(stage)?;
        let arguments = resolver.bind(stage.arguments(), &callable)?;
        debug!(callable = %callable.target(), "Invoking");
        Ok(callable.invoke(arguments)?)
    }

    fn store_result(&mut self, name: &str, value: Value) {
        let on_host = self
            .host
            .as_ref()
            .is_some_and(|host| host.set_attribute(name, value.clone()));
        if !on_host {
            self.store.set(name, value);
        }
    }
}

impl fmt::Display for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

impl fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pipeline")
            .field("stages", &self.stages)
            .field("host", &self.host)
            .field("store", &self.store)
            .field("options", &self.options)
            .field("state", &self.state)
            .field("run_id", &self.run_id)
            .finish_non_exhaustive()
    }
}
