#![forbid(unsafe_code)]

//! Step definitions and per-step overrides.

use std::fmt;
use std::rc::Rc;

use spotlight_core::{FloatingOptions, ShapeOptions};

use crate::backdrop::BackdropBehavior;
use crate::config::OverlayStyle;
use crate::error::StepHookError;
use crate::tour::SpotlightTour;

/// Produces the tooltip/navigation view for the active step.
pub type RenderHook = Rc<dyn Fn(&RenderProps<'_>) -> StepView>;

/// Runs before a step becomes active. An error keeps the tour where it is.
pub type BeforeHook = Rc<dyn Fn() -> Result<(), StepHookError>>;

/// Inputs to a [`RenderHook`].
pub struct RenderProps<'a> {
    pub index: usize,
    pub step_count: usize,
    pub is_first: bool,
    pub is_last: bool,
    pub step: &'a TourStep,
    /// Live handle; navigation buttons call straight into it.
    pub tour: &'a SpotlightTour,
}

/// Which navigation controls a view shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavControls {
    pub previous: bool,
    pub next: bool,
    pub stop: bool,
}

/// Render-ready description of the active step's tooltip.
#[derive(Debug, Clone, PartialEq)]
pub struct StepView {
    pub title: String,
    pub body: String,
    /// e.g. `"2 of 5"`.
    pub progress: String,
    pub controls: NavControls,
    /// Label for the forward control: "Next" or "Done" on the last step.
    pub next_label: &'static str,
}

impl StepView {
    /// The view used when a step has no render hook.
    #[must_use]
    pub fn standard(props: &RenderProps<'_>) -> Self {
        Self {
            title: props.step.title.clone(),
            body: props.step.body.clone(),
            progress: format!("{} of {}", props.index + 1, props.step_count),
            controls: NavControls {
                previous: !props.is_first,
                next: true,
                stop: true,
            },
            next_label: if props.is_last { "Done" } else { "Next" },
        }
    }
}

/// One stop in the tour.
#[derive(Clone, Default)]
pub struct TourStep {
    pub name: String,
    pub title: String,
    pub body: String,
    pub render: Option<RenderHook>,
    pub before: Option<BeforeHook>,
    pub on_backdrop_press: Option<BackdropBehavior>,
    pub shape: Option<ShapeOptions>,
    pub floating: Option<FloatingOptions>,
    pub overlay: Option<OverlayStyle>,
}

impl fmt::Debug for TourStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TourStep")
            .field("name", &self.name)
            .field("title", &self.title)
            .field("render", &self.render.is_some())
            .field("before", &self.before.is_some())
            .field("on_backdrop_press", &self.on_backdrop_press)
            .field("shape", &self.shape)
            .field("floating", &self.floating)
            .field("overlay", &self.overlay)
            .finish()
    }
}

impl TourStep {
    /// Create a named step.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    #[must_use]
    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    /// Custom view builder.
    #[must_use]
    pub fn render(mut self, hook: impl Fn(&RenderProps<'_>) -> StepView + 'static) -> Self {
        self.render = Some(Rc::new(hook));
        self
    }

    /// Hook run before this step is entered.
    #[must_use]
    pub fn before(mut self, hook: impl Fn() -> Result<(), StepHookError> + 'static) -> Self {
        self.before = Some(Rc::new(hook));
        self
    }

    /// Override the provider's backdrop behavior for this step.
    #[must_use]
    pub fn on_backdrop_press(mut self, behavior: impl Into<BackdropBehavior>) -> Self {
        self.on_backdrop_press = Some(behavior.into());
        self
    }

    #[must_use]
    pub fn shape(mut self, shape: ShapeOptions) -> Self {
        self.shape = Some(shape);
        self
    }

    #[must_use]
    pub fn floating(mut self, floating: FloatingOptions) -> Self {
        self.floating = Some(floating);
        self
    }

    #[must_use]
    pub fn overlay(mut self, overlay: OverlayStyle) -> Self {
        self.overlay = Some(overlay);
        self
    }

    /// Build the view for this step.
    #[must_use]
    pub fn view(&self, props: &RenderProps<'_>) -> StepView {
        match &self.render {
            Some(hook) => hook(props),
            None => StepView::standard(props),
        }
    }
}
