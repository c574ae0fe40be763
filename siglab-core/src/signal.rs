use crate::generator::{SignalGenerator, TimeSeries};
use crate::observer::{Subscribers, SubscriptionId};
use crate::palette::{ColorCursor, Rgb};
use catalog::ParameterSet;
use std::cell::{Cell, Ref, RefCell};
use std::fmt;
use std::rc::Rc;

/// Shared handle to a signal. Identity is the allocation, not the contents.
pub type SignalRef = Rc<Signal>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalChange {
    /// Parameters or equation changed and the series was recomputed.
    Recomputed,
    /// Only the display colour changed.
    Recolored,
}

struct SignalState {
    params: ParameterSet,
    equation: String,
    series: TimeSeries,
}

pub struct Signal {
    state: RefCell<SignalState>,
    color: Cell<Rgb>,
    generator: SignalGenerator,
    changes: Subscribers<SignalChange>,
}

impl Signal {
    /// Computes the series immediately. A broken equation yields zeros.
    pub fn new(
        params: ParameterSet,
        equation: impl Into<String>,
        color: Rgb,
        generator: SignalGenerator,
    ) -> Self {
        let equation = equation.into();
        let series = generator.generate(&params, &equation);
        Self {
            state: RefCell::new(SignalState {
                params,
                equation,
                series,
            }),
            color: Cell::new(color),
            generator,
            changes: Subscribers::new(),
        }
    }

    pub fn name(&self) -> String {
        self.state.borrow().params.name()
    }

    pub fn params(&self) -> ParameterSet {
        self.state.borrow().params.clone()
    }

    pub fn equation(&self) -> String {
        self.state.borrow().equation.clone()
    }

    pub fn series(&self) -> Ref<'_, TimeSeries> {
        Ref::map(self.state.borrow(), |state| &state.series)
    }

    pub fn t(&self) -> Ref<'_, [f64]> {
        Ref::map(self.state.borrow(), |state| state.series.t.as_slice())
    }

    pub fn y(&self) -> Ref<'_, [f64]> {
        Ref::map(self.state.borrow(), |state| state.series.y.as_slice())
    }

    pub fn color(&self) -> Rgb {
        self.color.get()
    }

    pub fn generator(&self) -> &SignalGenerator {
        &self.generator
    }

    /// Replaces parameters and equation, recomputes the whole series and
    /// notifies every listener once.
    pub fn update(&self, params: ParameterSet, equation: impl Into<String>) {
        let equation = equation.into();
        let series = self.generator.generate(&params, &equation);
        {
            let mut state = self.state.borrow_mut();
            state.params = params;
            state.equation = equation;
            state.series = series;
        }
        self.changes.emit(&SignalChange::Recomputed);
    }

    pub fn set_color(&self, color: Rgb) {
        self.color.set(color);
        self.changes.emit(&SignalChange::Recolored);
    }

    pub fn subscribe(&self, listener: impl Fn(&SignalChange) + 'static) -> SubscriptionId {
        self.changes.subscribe(listener)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.changes.unsubscribe(id)
    }
}

impl fmt::Debug for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("Signal")
            .field("name", &state.params.name())
            .field("equation", &state.equation)
            .field("samples", &state.series.len())
            .field("color", &self.color.get())
            .finish()
    }
}

/// Creates signals with a shared generator, handing each the next palette colour.
///
/// Each factory owns one colour sequence and is not `Clone`.
#[derive(Debug, Default)]
pub struct SignalFactory {
    generator: SignalGenerator,
    colors: ColorCursor,
}

impl SignalFactory {
    pub fn new(generator: SignalGenerator, colors: ColorCursor) -> Self {
        Self { generator, colors }
    }

    pub fn generator(&self) -> &SignalGenerator {
        &self.generator
    }

    pub fn set_generator(&mut self, generator: SignalGenerator) {
        self.generator = generator;
    }

    pub fn colors(&self) -> &ColorCursor {
        &self.colors
    }

    pub fn create(&mut self, params: ParameterSet, equation: impl Into<String>) -> SignalRef {
        let color = self.colors.next_color();
        Rc::new(Signal::new(params, equation, color, self.generator))
    }
}
