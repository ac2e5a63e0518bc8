//! Pedigree engine
//!
//! One engine owns a working copy of the dataset, the original snapshot used
//! by [`reset`](PedigreeEngine::reset), the coordinate index of the last
//! render, the interaction state and the drawing surface. Engines share no
//! state, so any number of them can live side by side.
//!
//! # Example
//! ```
//! use pedigree::core::{GridPos, Person, RecordingSurface, Sex};
//! use pedigree::plugins::pedigree::PedigreeEngine;
//!
//! let mut engine = PedigreeEngine::builder()
//!     .persons(vec![
//!         Person::new("A", "Father", Sex::Male, GridPos::new(0.0, 0.0)).with_mate("B"),
//!         Person::new("B", "Mother", Sex::Female, GridPos::new(2.0, 0.0)),
//!         Person::new("C", "Child", Sex::Female, GridPos::new(1.0, 1.0)).with_parents("A", "B"),
//!     ])
//!     .surface(RecordingSurface::new())
//!     .build()
//!     .unwrap();
//!
//! engine.pointer_down(40.0, 40.0);
//! engine.pointer_move(600.0, 40.0);
//! engine.pointer_up();
//! assert_eq!(engine.persons()[0].pos, GridPos::new(7.0, 0.0));
//! ```

use tracing::{debug, info, span, trace, Level};

use super::{
    legend, Connection, CoordinateIndex, InteractionController, InteractionEffect,
    InteractionState, LegendEntry, PedigreeDatabase, PedigreeRenderer, SiblingSwapOptimizer,
    TouchPoint,
};
use crate::core::{
    CursorStyle, ExportFormat, GridPos, LayoutAlgorithm, PedigreeConfig, PedigreeError, Person,
    Point, Surface,
};

/// Hook invoked with a snapshot of the dataset whenever a drag ends
pub type NodeMovedHook = Box<dyn FnMut(Vec<Person>)>;

/// Builder for [`PedigreeEngine`]
pub struct PedigreeEngineBuilder<S: Surface> {
    persons: Vec<Person>,
    config: PedigreeConfig,
    surface: Option<S>,
    optimizer: Option<Box<dyn LayoutAlgorithm<PedigreeDatabase>>>,
    on_node_moved: Option<NodeMovedHook>,
}

impl<S: Surface> Default for PedigreeEngineBuilder<S> {
    fn default() -> Self {
        Self {
            persons: Vec::new(),
            config: PedigreeConfig::default(),
            surface: None,
            optimizer: None,
            on_node_moved: None,
        }
    }
}

impl<S: Surface> PedigreeEngineBuilder<S> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn persons(mut self, persons: impl IntoIterator<Item = Person>) -> Self {
        self.persons = persons.into_iter().collect();
        self
    }

    pub fn config(mut self, config: PedigreeConfig) -> Self {
        self.config = config;
        self
    }

    pub fn surface(mut self, surface: S) -> Self {
        self.surface = Some(surface);
        self
    }

    /// Replace the default [`SiblingSwapOptimizer`]
    pub fn optimizer(
        mut self,
        optimizer: impl LayoutAlgorithm<PedigreeDatabase> + 'static,
    ) -> Self {
        self.optimizer = Some(Box::new(optimizer));
        self
    }

    pub fn on_node_moved(mut self, hook: impl FnMut(Vec<Person>) + 'static) -> Self {
        self.on_node_moved = Some(Box::new(hook));
        self
    }

    /// Validate everything, then run the first optimize and render
    pub fn build(self) -> Result<PedigreeEngine<S>, PedigreeError> {
        let build_span = span!(Level::INFO, "build_engine", person_count = self.persons.len());
        let _enter = build_span.enter();

        let surface = self.surface.ok_or(PedigreeError::SurfaceUnavailable)?;
        self.config.validate()?;
        let original = PedigreeDatabase::from_persons(self.persons)?;

        let renderer = PedigreeRenderer::new(self.config.clone());
        let optimizer = self.optimizer.unwrap_or_else(|| {
            Box::new(SiblingSwapOptimizer::with_transform(renderer.transform()))
        });
        debug!(optimizer = optimizer.name(), "Building pedigree engine");

        let mut engine = PedigreeEngine {
            working: original.clone(),
            original,
            index: CoordinateIndex::new(),
            connections: Vec::new(),
            controller: InteractionController::new(self.config.clone()),
            renderer,
            optimizer,
            surface,
            on_node_moved: self.on_node_moved,
            config: self.config,
        };
        engine.redraw();
        Ok(engine)
    }
}

/// Interactive pedigree renderer bound to one surface
pub struct PedigreeEngine<S: Surface> {
    config: PedigreeConfig,
    working: PedigreeDatabase,
    original: PedigreeDatabase,
    index: CoordinateIndex,
    connections: Vec<Connection>,
    controller: InteractionController,
    renderer: PedigreeRenderer,
    optimizer: Box<dyn LayoutAlgorithm<PedigreeDatabase>>,
    surface: S,
    on_node_moved: Option<NodeMovedHook>,
}

impl<S: Surface> PedigreeEngine<S> {
    pub fn builder() -> PedigreeEngineBuilder<S> {
        PedigreeEngineBuilder::new()
    }

    /// Draw the working dataset as it is, without optimizing
    pub fn render(&mut self) {
        self.connections = self
            .renderer
            .render(&self.working, &mut self.surface, &mut self.index);
    }

    /// Optimize (when enabled) and render; returns the number of swaps
    pub fn redraw(&mut self) -> usize {
        let redraw_span = span!(
            Level::DEBUG,
            "redraw_pedigree",
            optimizer = self.optimizer.name()
        );
        let _enter = redraw_span.enter();

        let swaps = if self.config.auto_layout_optimize {
            self.optimizer.optimize(&mut self.working)
        } else {
            0
        };
        self.render();
        swaps
    }

    /// Move a person programmatically, clamped to the grid origin, and redraw
    ///
    /// Returns false when the id is unknown; nothing is redrawn then.
    pub fn move_node(&mut self, id: &str, pos: GridPos) -> bool {
        if !self.working.set_position(id, pos.clamped()) {
            debug!(id, "Ignoring move of unknown person");
            return false;
        }
        self.redraw();
        true
    }

    pub fn pointer_down(&mut self, x: f64, y: f64) -> Vec<InteractionEffect> {
        let effects = self
            .controller
            .pointer_down(Point::new(x, y), &self.working, &self.index);
        self.apply(effects)
    }

    pub fn pointer_move(&mut self, x: f64, y: f64) -> Vec<InteractionEffect> {
        let effects = self
            .controller
            .pointer_move(Point::new(x, y), &self.working, &self.index);
        self.apply(effects)
    }

    pub fn pointer_up(&mut self) -> Vec<InteractionEffect> {
        let effects = self.controller.pointer_up();
        self.apply(effects)
    }

    pub fn pointer_leave(&mut self) -> Vec<InteractionEffect> {
        let effects = self.controller.pointer_leave();
        self.apply(effects)
    }

    pub fn touch_start(&mut self, touches: &[TouchPoint]) -> Vec<InteractionEffect> {
        let effects = self
            .controller
            .touch_start(touches, &self.working, &self.index);
        self.apply(effects)
    }

    pub fn touch_move(&mut self, touches: &[TouchPoint]) -> Vec<InteractionEffect> {
        let effects = self
            .controller
            .touch_move(touches, &self.working, &self.index);
        self.apply(effects)
    }

    pub fn touch_end(&mut self) -> Vec<InteractionEffect> {
        let effects = self.controller.touch_end();
        self.apply(effects)
    }

    /// Restore the dataset given at construction, drop any drag and redraw
    pub fn reset(&mut self) {
        info!(person_count = self.original.len(), "Resetting pedigree");
        self.working = self.original.clone();
        self.controller.cancel();
        self.redraw();
    }

    /// The working dataset in input order
    pub fn persons(&self) -> &[Person] {
        self.working.persons()
    }

    pub fn database(&self) -> &PedigreeDatabase {
        &self.working
    }

    /// Node centres resolved by the last render
    pub fn coordinates(&self) -> &CoordinateIndex {
        &self.index
    }

    /// Segments stroked by the last render
    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    pub fn legend(&self) -> Vec<LegendEntry> {
        legend(self.working.persons(), &self.config)
    }

    pub fn cursor(&self) -> CursorStyle {
        self.controller.cursor()
    }

    pub fn state(&self) -> &InteractionState {
        self.controller.state()
    }

    pub fn config(&self) -> &PedigreeConfig {
        &self.config
    }

    pub fn export(&self, format: ExportFormat) -> Result<Vec<u8>, PedigreeError> {
        self.surface.export(format)
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn into_surface(self) -> S {
        self.surface
    }

    fn apply(&mut self, effects: Vec<InteractionEffect>) -> Vec<InteractionEffect> {
        for effect in &effects {
            match effect {
                InteractionEffect::MoveNode { id, pos } => {
                    self.working.set_position(id, *pos);
                    self.redraw();
                }
                InteractionEffect::DragFinished { id } => {
                    debug!(id = %id, "Notifying node moved");
                    if let Some(hook) = self.on_node_moved.as_mut() {
                        hook(self.working.snapshot());
                    }
                }
                InteractionEffect::SetCursor(cursor) => {
                    trace!(%cursor, "Cursor changed");
                }
            }
        }
        effects
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{NoopLayout, RecordingSurface, Sex};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn family() -> Vec<Person> {
        vec![
            Person::new("A", "Father", Sex::Male, GridPos::new(0.0, 0.0)).with_mate("B"),
            Person::new("B", "Mother", Sex::Female, GridPos::new(2.0, 0.0)).with_mate("A"),
            Person::new("C", "Child", Sex::Female, GridPos::new(1.0, 1.0)).with_parents("A", "B"),
        ]
    }

    fn engine() -> PedigreeEngine<RecordingSurface> {
        PedigreeEngine::builder()
            .persons(family())
            .surface(RecordingSurface::new())
            .build()
            .unwrap()
    }

    #[test]
    fn test_build_requires_surface() {
        let result = PedigreeEngine::<RecordingSurface>::builder()
            .persons(family())
            .build();
        assert!(matches!(result, Err(PedigreeError::SurfaceUnavailable)));
    }

    #[test]
    fn test_build_renders_once() {
        let engine = engine();
        assert_eq!(engine.coordinates().len(), 3);
        assert_eq!(engine.connections().len(), 4);
        assert_eq!(engine.surface().texts(), vec!["Father", "Mother", "Child"]);
    }

    #[test]
    fn test_move_node_clamps_and_redraws() {
        let mut engine = engine();
        assert!(engine.move_node("C", GridPos::new(-3.0, 2.0)));
        assert_eq!(engine.persons()[2].pos, GridPos::new(0.0, 2.0));
        assert_eq!(engine.coordinates().get("C"), Some(Point::new(40.0, 240.0)));
        assert!(!engine.move_node("nobody", GridPos::default()));
    }

    #[test]
    fn test_drag_notifies_hook_with_snapshot() {
        let received: Rc<RefCell<Vec<Vec<Person>>>> = Rc::default();
        let sink = Rc::clone(&received);
        let mut engine = PedigreeEngine::builder()
            .persons(family())
            .surface(RecordingSurface::new())
            .on_node_moved(move |persons| sink.borrow_mut().push(persons))
            .build()
            .unwrap();

        engine.pointer_down(120.0, 140.0);
        assert_eq!(engine.cursor(), CursorStyle::Grabbing);
        engine.pointer_move(120.0, 240.0);
        assert!(received.borrow().is_empty());
        engine.pointer_up();

        let received = received.borrow();
        assert_eq!(received.len(), 1);
        assert_eq!(received[0][2].pos, GridPos::new(1.0, 2.0));
        assert_eq!(engine.cursor(), CursorStyle::Default);
    }

    #[test]
    fn test_reset_restores_original() {
        let mut engine = engine();
        engine.pointer_down(120.0, 140.0);
        engine.pointer_move(440.0, 340.0);
        assert_eq!(engine.persons()[2].pos, GridPos::new(5.0, 3.0));

        engine.reset();
        assert_eq!(engine.persons()[2].pos, GridPos::new(1.0, 1.0));
        assert_eq!(engine.state(), &InteractionState::Idle);
        assert_eq!(engine.coordinates().get("C"), Some(Point::new(120.0, 140.0)));
    }

    #[test]
    fn test_optimizer_toggle_and_plugging() {
        let persons = vec![
            Person::new("S1", "", Sex::Male, GridPos::new(0.0, 1.0))
                .with_parents("X", "Y")
                .with_mate("M"),
            Person::new("S2", "", Sex::Male, GridPos::new(1.0, 1.0)).with_parents("X", "Y"),
            Person::new("M", "", Sex::Female, GridPos::new(2.0, 1.0)),
        ];

        let engine = PedigreeEngine::builder()
            .persons(persons.clone())
            .surface(RecordingSurface::new())
            .build()
            .unwrap();
        assert_eq!(engine.persons()[0].pos.x, 1.0);

        let config = PedigreeConfig {
            auto_layout_optimize: false,
            ..Default::default()
        };
        let engine = PedigreeEngine::builder()
            .persons(persons.clone())
            .config(config)
            .surface(RecordingSurface::new())
            .build()
            .unwrap();
        assert_eq!(engine.persons()[0].pos.x, 0.0);

        let engine = PedigreeEngine::builder()
            .persons(persons)
            .surface(RecordingSurface::new())
            .optimizer(NoopLayout)
            .build()
            .unwrap();
        assert_eq!(engine.persons()[0].pos.x, 0.0);
    }

    #[test]
    fn test_export_delegates_to_surface() {
        let engine = engine();
        assert!(matches!(
            engine.export(ExportFormat::Svg),
            Err(PedigreeError::ExportUnsupported { .. })
        ));
    }

    #[test]
    fn test_legend_from_working_copy() {
        let engine = engine();
        let labels: Vec<_> = engine.legend().into_iter().map(|e| e.label).collect();
        assert_eq!(labels, vec!["Male", "Female"]);
    }
}
