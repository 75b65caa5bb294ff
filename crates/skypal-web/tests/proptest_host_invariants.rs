//! Property-based invariant tests for the host bridge.
//!
//! Verifies:
//! 1. The focus guard denies exactly while the palette is open
//! 2. `focus-input` is only ever emitted while the palette is open
//! 3. Every visibility change is announced, and announcements alternate
//! 4. At most one command runs per confirm, and it always closes the palette

use core::time::Duration;

use proptest::prelude::*;
use skypal_core::event::{Event, PointerTarget};
use skypal_web::input::DomKeyEvent;
use skypal_web::{InboundMessage, OutboundMessage, PaletteConfig, PaletteHost};

// ── Strategy helpers ──────────────────────────────────────────────────

#[derive(Debug, Clone)]
enum Op {
    Open,
    Lang(&'static str),
    Key(&'static str),
    Composing(&'static str),
    Query(String),
    Click(PointerTarget),
    Advance(u64),
    Report(bool),
    Step,
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        2 => Just(Op::Open),
        1 => prop::sample::select(vec!["en", "ja", "fr"]).prop_map(Op::Lang),
        4 => prop::sample::select(vec!["ArrowDown", "ArrowUp", "Enter", "Escape", "Backspace", "a", "s", "ほ"])
            .prop_map(Op::Key),
        1 => prop::sample::select(vec!["Enter", "ArrowDown"]).prop_map(Op::Composing),
        2 => "[a-zほーむ検索]{0,6}".prop_map(Op::Query),
        1 => prop_oneof![
            Just(PointerTarget::Backdrop),
            Just(PointerTarget::Panel),
            Just(PointerTarget::ClearButton),
            (0usize..12).prop_map(PointerTarget::Row),
        ]
        .prop_map(Op::Click),
        3 => (0u64..250).prop_map(Op::Advance),
        1 => any::<bool>().prop_map(Op::Report),
        3 => Just(Op::Step),
    ]
}

fn apply(host: &mut PaletteHost, op: &Op) {
    match op {
        Op::Open => host.push_message(InboundMessage::OpenPalette),
        Op::Lang(code) => host.push_message(InboundMessage::BskyLang {
            lang: (*code).to_owned(),
        }),
        Op::Key(k) => {
            host.push_dom_key(&DomKeyEvent::keydown(*k));
        }
        Op::Composing(k) => {
            let mut event = DomKeyEvent::keydown(*k);
            event.is_composing = true;
            assert!(!host.push_dom_key(&event));
        }
        Op::Query(q) => host.push_event(Event::QueryInput(q.clone())),
        Op::Click(target) => host.push_event(Event::Pointer(*target)),
        Op::Advance(ms) => host.advance_time(Duration::from_millis(*ms)),
        Op::Report(focused) => host.report_focus(*focused),
        Op::Step => {
            host.step();
        }
    }
}

proptest! {
    #[test]
    fn bridge_invariants_hold(ops in prop::collection::vec(arb_op(), 1..60)) {
        let mut host = PaletteHost::new(PaletteConfig::default());
        let mut open = false;

        for op in &ops {
            apply(&mut host, op);
            if !matches!(op, Op::Step) {
                continue;
            }
            let outputs = host.take_outputs().messages;
            for (i, message) in outputs.iter().enumerate() {
                match message {
                    OutboundMessage::PaletteOpenState { open: now_open } => {
                        prop_assert_ne!(*now_open, open, "repeated visibility announcement");
                        open = *now_open;
                    }
                    OutboundMessage::FocusInput => prop_assert!(open),
                    OutboundMessage::Navigate { .. } | OutboundMessage::EditShortcut => {
                        // A command always closes the palette right after.
                        prop_assert_eq!(
                            outputs.get(i + 1),
                            Some(&OutboundMessage::PaletteOpenState { open: false })
                        );
                    }
                }
            }
            prop_assert_eq!(open, host.palette().is_visible());
            prop_assert_eq!(host.focus_allowed(), !open);
        }
    }
}
