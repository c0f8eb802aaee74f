//! Scene building and pick resolution for population scatter plots.

use std::fmt;

use log::debug;

use crate::population::{Bounds, Population};
use crate::schema::{ConfigError, PlotConfig};

/// Error type returned by rendering backends.
pub type RenderError = Box<dyn std::error::Error + Send + Sync>;

/// External scatter-plot facility.
pub trait PlotBackend {
    /// Draw a complete scene. Called at most once per plot request.
    fn render(&mut self, scene: &ScatterScene) -> Result<(), RenderError>;
}

/// Plot layout implied by the number of requested objectives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneKind {
    /// Two objectives, 2D scatter.
    Planar,
    /// Three objectives, 3D scatter.
    Spatial,
    /// Four objectives, 3D scatter with the fourth mapped to color.
    SpatialColored,
}

impl SceneKind {
    fn for_count(count: usize) -> Option<Self> {
        match count {
            2 => Some(SceneKind::Planar),
            3 => Some(SceneKind::Spatial),
            4 => Some(SceneKind::SpatialColored),
            _ => None,
        }
    }
}

/// One plotted objective.
#[derive(Debug, Clone)]
pub struct Axis {
    /// Index into `objective_values`.
    pub objective: usize,
    /// Objective column header.
    pub label: String,
    /// One value per plotted point.
    pub values: Vec<f64>,
    pub bounds: Bounds,
}

/// Precomputed coordinates handed to a `PlotBackend`.
///
/// Only `build` creates scenes, so every scene has an axis per requested
/// objective and one value per point on each axis.
#[derive(Debug, Clone)]
pub struct ScatterScene {
    kind: SceneKind,
    /// Axes in request order: x, y, then z and color when present.
    axes: Vec<Axis>,
    /// Description of the solution behind each point.
    descriptions: Vec<String>,
    title: Option<String>,
}

impl ScatterScene {
    /// Build a scene from the feasible solutions of a population.
    pub fn build(
        population: &Population,
        objective_indices: &[usize],
        threshold: f64,
    ) -> Result<Self, PlotError> {
        let kind = SceneKind::for_count(objective_indices.len())
            .ok_or(PlotError::InvalidObjectiveCount(objective_indices.len()))?;

        let available = population.objective_column_headers.len();
        if let Some(&index) = objective_indices.iter().find(|&&i| i >= available) {
            return Err(PlotError::ObjectiveOutOfRange { index, available });
        }

        let feasible: Vec<_> = population.feasible_solutions(threshold).collect();
        if feasible.is_empty() {
            return Err(PlotError::NoFeasibleSolutions);
        }
        debug!(
            "Plotting {} of {} solutions",
            feasible.len(),
            population.len()
        );

        let mut axes = Vec::with_capacity(objective_indices.len());
        for &objective in objective_indices {
            let values = feasible
                .iter()
                .map(|s| s.objective_values.get(objective).copied())
                .collect::<Option<Vec<f64>>>()
                .ok_or(PlotError::ObjectiveOutOfRange {
                    index: objective,
                    available,
                })?;
            let bounds = Bounds::from_values(values.iter().copied())
                .ok_or(PlotError::NoFeasibleSolutions)?;

            axes.push(Axis {
                objective,
                label: population.objective_column_headers[objective].clone(),
                values,
                bounds,
            });
        }

        Ok(Self {
            kind,
            axes,
            descriptions: feasible.iter().map(|s| s.description.clone()).collect(),
            title: None,
        })
    }

    /// Number of plotted points.
    #[inline]
    pub fn len(&self) -> usize {
        self.descriptions.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.descriptions.is_empty()
    }

    pub fn kind(&self) -> SceneKind {
        self.kind
    }

    pub fn axes(&self) -> &[Axis] {
        &self.axes
    }

    pub fn descriptions(&self) -> &[String] {
        &self.descriptions
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn x(&self) -> &Axis {
        &self.axes[0]
    }

    pub fn y(&self) -> &Axis {
        &self.axes[1]
    }

    pub fn z(&self) -> Option<&Axis> {
        self.axes.get(2)
    }

    /// Axis mapped to point color, present only for four-objective scenes.
    pub fn color(&self) -> Option<&Axis> {
        self.axes.get(3)
    }

    /// Resolve a plotted point back to its solution and coordinates.
    pub fn resolve(&self, point: usize) -> Option<PickEvent> {
        let description = self.descriptions.get(point)?.clone();
        let value = |axis: usize| self.axes.get(axis)?.values.get(point).copied();
        Some(PickEvent {
            point,
            description,
            x: value(0)?,
            y: value(1)?,
            z: value(2),
            color: value(3),
        })
    }
}

/// A picked point: the originating solution's description and its coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct PickEvent {
    pub point: usize,
    pub description: String,
    pub x: f64,
    pub y: f64,
    pub z: Option<f64>,
    pub color: Option<f64>,
}

impl fmt::Display for PickEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.description, self.x, self.y)?;
        if let Some(z) = self.z {
            write!(f, " {}", z)?;
        }
        if let Some(c) = self.color {
            write!(f, " (color {})", c)?;
        }
        Ok(())
    }
}

/// A rendered plot with its pick binding.
pub struct PlotSession<F: FnMut(&PickEvent)> {
    scene: ScatterScene,
    on_pick: F,
}

impl<F: FnMut(&PickEvent)> PlotSession<F> {
    pub fn scene(&self) -> &ScatterScene {
        &self.scene
    }

    /// Handle a pick on point `point`. Returns the event passed to the handler,
    /// or `None` when the index is not a plotted point.
    pub fn pick(&mut self, point: usize) -> Option<PickEvent> {
        let event = self.scene.resolve(point)?;
        (self.on_pick)(&event);
        Some(event)
    }
}

impl<F: FnMut(&PickEvent)> fmt::Debug for PlotSession<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlotSession")
            .field("scene", &self.scene)
            .finish_non_exhaustive()
    }
}

/// Scatter-plot feasible solutions over 2 to 4 objectives.
///
/// `objective_indices` are ordered `[x, y, z, color]`. All preconditions are
/// checked before the backend is called.
pub fn plot_population<B, F>(
    population: &Population,
    objective_indices: &[usize],
    config: &PlotConfig,
    backend: &mut B,
    on_pick: F,
) -> Result<PlotSession<F>, PlotError>
where
    B: PlotBackend + ?Sized,
    F: FnMut(&PickEvent),
{
    config.validate()?;

    let mut scene = ScatterScene::build(
        population,
        objective_indices,
        config.infeasibility_threshold,
    )?;
    scene.title = config.title.clone();

    backend.render(&scene).map_err(PlotError::Render)?;

    Ok(PlotSession { scene, on_pick })
}

/// Plotting errors.
#[derive(Debug, thiserror::Error)]
pub enum PlotError {
    #[error("Between 2 and 4 objectives must be plotted, got {0}")]
    InvalidObjectiveCount(usize),
    #[error("Objective index {index} out of range ({available} objectives)")]
    ObjectiveOutOfRange { index: usize, available: usize },
    #[error("No feasible solutions to plot")]
    NoFeasibleSolutions,
    #[error("Invalid plot configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("Rendering failed")]
    Render(#[source] RenderError),
}
