use catalog::{GeneratorSettings, ParameterSet};
use siglab_core::{
    ColorCursor, LibraryError, LibraryEvent, Rgb, SignalChange, SignalFactory, SignalGenerator,
    SignalLibrary, SignalRef, DEFAULT_PALETTE,
};
use std::cell::RefCell;
use std::rc::Rc;

fn small_factory() -> SignalFactory {
    SignalFactory::new(
        SignalGenerator::new(GeneratorSettings {
            duration: 1.0,
            sampling_rate: 8.0,
        }),
        ColorCursor::default(),
    )
}

fn named(factory: &mut SignalFactory, name: &str) -> SignalRef {
    factory.create(ParameterSet::new().with("name", name), "time")
}

fn names(library: &SignalLibrary) -> Vec<String> {
    library.iter().map(|signal| signal.name()).collect()
}

#[test]
fn construction_computes_the_series() {
    let mut factory = small_factory();
    let signal = factory.create(ParameterSet::new().with("k", 2.0), "k * time");
    assert_eq!(signal.t().len(), 8);
    assert_eq!(signal.y()[4], 1.0);
    assert_eq!(signal.equation(), "k * time");
    assert_eq!(signal.name(), "Unnamed");
}

#[test]
fn broken_equation_still_yields_a_series() {
    let mut factory = small_factory();
    let signal = factory.create(ParameterSet::new(), "numpy.sin(");
    assert_eq!(signal.series().y, vec![0.0; 8]);
    assert_eq!(signal.series().t.len(), 8);
}

#[test]
fn palette_wraps_after_eight_signals() {
    let mut factory = small_factory();
    let signals: Vec<SignalRef> = (0..9)
        .map(|i| named(&mut factory, &format!("s{i}")))
        .collect();
    for (signal, expected) in signals.iter().zip(DEFAULT_PALETTE.iter()) {
        assert_eq!(signal.color(), *expected);
    }
    assert_eq!(signals[8].color(), signals[0].color());
    assert_eq!(factory.colors().issued(), 9);
}

#[test]
fn palette_continues_across_generator_changes() {
    let mut factory = small_factory();
    let first = named(&mut factory, "first");
    factory.set_generator(SignalGenerator::new(GeneratorSettings {
        duration: 1.0,
        sampling_rate: 2.0,
    }));
    let second = named(&mut factory, "second");

    assert_eq!(first.color(), DEFAULT_PALETTE[0]);
    assert_eq!(second.color(), DEFAULT_PALETTE[1]);
    assert_eq!(second.series().len(), 2);
    assert_eq!(factory.colors().issued(), 2);
}

#[test]
fn update_recomputes_and_notifies_once() {
    let mut factory = small_factory();
    let signal = factory.create(ParameterSet::new().with("name", "before"), "time");
    let changes = Rc::new(RefCell::new(Vec::new()));
    {
        let changes = Rc::clone(&changes);
        signal.subscribe(move |change| changes.borrow_mut().push(*change));
    }

    signal.update(ParameterSet::new().with("name", "after"), "3");
    assert_eq!(*changes.borrow(), vec![SignalChange::Recomputed]);
    assert_eq!(signal.name(), "after");
    assert_eq!(signal.series().y, vec![3.0; 8]);

    signal.update(ParameterSet::new(), "time * 0");
    assert_eq!(changes.borrow().len(), 2);
    assert_eq!(signal.name(), "Unnamed");
}

#[test]
fn listeners_can_read_the_signal_during_notification() {
    let mut factory = small_factory();
    let signal = factory.create(ParameterSet::new(), "time");
    let seen = Rc::new(RefCell::new(Vec::new()));
    {
        let seen = Rc::clone(&seen);
        let weak = Rc::downgrade(&signal);
        signal.subscribe(move |_| {
            if let Some(signal) = weak.upgrade() {
                seen.borrow_mut().push(signal.y()[1]);
            }
        });
    }
    signal.update(ParameterSet::new(), "7");
    assert_eq!(*seen.borrow(), vec![7.0]);
}

#[test]
fn recolouring_notifies_without_recomputing() {
    let mut factory = small_factory();
    let signal = factory.create(ParameterSet::new(), "time");
    let before = signal.series().clone();
    let changes = Rc::new(RefCell::new(Vec::new()));
    let id = {
        let changes = Rc::clone(&changes);
        signal.subscribe(move |change| changes.borrow_mut().push(*change))
    };

    signal.set_color(Rgb(1, 2, 3));
    assert_eq!(signal.color(), Rgb(1, 2, 3));
    assert_eq!(*changes.borrow(), vec![SignalChange::Recolored]);
    assert_eq!(*signal.series(), before);

    assert!(signal.unsubscribe(id));
    signal.set_color(Rgb(4, 5, 6));
    assert_eq!(changes.borrow().len(), 1);
}

#[test]
fn library_keeps_insertion_order_and_removes_by_identity() {
    let mut factory = small_factory();
    let library = SignalLibrary::new();
    let a = named(&mut factory, "A");
    let b = named(&mut factory, "B");
    let c = named(&mut factory, "C");
    for signal in [&a, &b, &c] {
        assert!(library.add(Rc::clone(signal)));
    }

    assert!(library.remove(&b));
    assert_eq!(names(&library), vec!["A", "C"]);

    assert!(!library.remove(&b));
    let twin = named(&mut factory, "A");
    assert!(!library.remove(&twin));
    assert_eq!(library.len(), 2);
}

#[test]
fn library_ignores_duplicate_identity() {
    let mut factory = small_factory();
    let library = SignalLibrary::new();
    let a = named(&mut factory, "A");
    assert!(library.add(Rc::clone(&a)));
    assert!(!library.add(Rc::clone(&a)));
    assert!(library.add(named(&mut factory, "A")));
    assert_eq!(names(&library), vec!["A", "A"]);
}

#[test]
fn library_index_access() {
    let mut factory = small_factory();
    let library = SignalLibrary::new();
    let a = named(&mut factory, "A");
    library.add(Rc::clone(&a));

    assert!(Rc::ptr_eq(&library.get(0).unwrap(), &a));
    assert_eq!(library.position(&a), Some(0));
    assert_eq!(
        library.get(1).unwrap_err(),
        LibraryError::IndexOutOfRange { index: 1, len: 1 }
    );
}

#[test]
fn library_announces_additions_and_removals() {
    let mut factory = small_factory();
    let library = Rc::new(SignalLibrary::new());
    let log = Rc::new(RefCell::new(Vec::new()));
    {
        let log = Rc::clone(&log);
        let weak = Rc::downgrade(&library);
        library.subscribe(move |event| {
            let members = weak.upgrade().map(|library| library.len()).unwrap_or(0);
            let sign = match event {
                LibraryEvent::Added(_) => '+',
                LibraryEvent::Removed(_) => '-',
            };
            let entry = format!("{sign}{} ({members})", event.signal().name());
            log.borrow_mut().push(entry);
        });
    }

    let a = named(&mut factory, "A");
    library.add(Rc::clone(&a));
    library.add(Rc::clone(&a));
    library.remove(&a);
    library.remove(&a);

    assert_eq!(*log.borrow(), vec!["+A (1)", "-A (0)"]);
}
