//! Property tests for the session cursor and playlist ordering

mod common;

use common::{records, FakeEngine};
use proptest::prelude::*;
use reelpipe::media::collation::{compare_names, sort_by_name};
use std::cmp::Ordering;
use reelpipe::playback::{EngineEvent, PlaybackSession, SessionUpdate};

#[derive(Debug, Clone)]
enum Op {
    Fail,
    Next,
    Previous,
    EngineMovedTo(usize),
    Toggle,
}

fn arbitrary_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        Just(Op::Fail),
        Just(Op::Next),
        Just(Op::Previous),
        (0usize..40).prop_map(Op::EngineMovedTo),
        Just(Op::Toggle),
    ]
}

proptest! {
    /// Property: the cursor never leaves the playlist, whatever the engine or user does
    #[test]
    fn cursor_stays_in_range(
        len in 1usize..20,
        start in 0usize..30,
        ops in prop::collection::vec(arbitrary_op(), 0..60)
    ) {
        let names: Vec<String> = (0..len).map(|i| format!("v{:02}.mp4", i)).collect();
        let name_refs: Vec<&str> = names.iter().map(String::as_str).collect();
        let (engine, handle) = FakeEngine::new();
        let mut session = PlaybackSession::new(Box::new(engine));
        session.set_playlist(records("/videos", &name_refs), start);

        for op in ops {
            let before = session.playlist().index();
            match op {
                Op::Fail => {
                    let update = session.handle_event(EngineEvent::Error { message: "bad".to_string() });
                    match update {
                        SessionUpdate::Skipped { failed, next } => {
                            prop_assert_eq!(failed, before);
                            prop_assert_eq!(next, before + 1);
                        }
                        SessionUpdate::Halted { index } => {
                            prop_assert_eq!(index, len - 1);
                        }
                        other => prop_assert!(false, "unexpected update {:?}", other),
                    }
                }
                Op::Next => {
                    session.next_track();
                }
                Op::Previous => {
                    session.previous_track();
                }
                Op::EngineMovedTo(index) => {
                    session.handle_event(EngineEvent::TrackChanged { index });
                }
                Op::Toggle => {
                    session.toggle_play_pause();
                }
            }

            prop_assert!(session.playlist().index() < len);
            prop_assert_eq!(session.playlist().len(), len);
        }
        prop_assert!(handle.state().index < len);
    }

    /// Property: name ordering is a sorted permutation under the collator
    #[test]
    fn sort_is_ordered_permutation(names in prop::collection::vec("[a-zA-Z\u{e0}-\u{ff}ØøŁłĐđ ]{0,8}", 0..30)) {
        let mut sorted = names.clone();
        sort_by_name(&mut sorted, |name| name.as_str());

        prop_assert_eq!(sorted.len(), names.len());
        for pair in sorted.windows(2) {
            prop_assert_ne!(compare_names(&pair[0], &pair[1]), Ordering::Greater);
        }

        let mut original = names.clone();
        let mut result = sorted.clone();
        original.sort();
        result.sort();
        prop_assert_eq!(original, result);
    }

    /// Property: stroked letters sort with their base letter, ahead of later letters
    #[test]
    fn stroked_letters_keep_base_letter_position(tail in "[a-z]{0,6}") {
        prop_assert_eq!(compare_names(&format!("Ø{}", tail), &format!("P{}", tail)), Ordering::Less);
        prop_assert_eq!(compare_names(&format!("ø{}", tail), &format!("Z{}", tail)), Ordering::Less);
        prop_assert_eq!(compare_names(&format!("Ł{}", tail), &format!("M{}", tail)), Ordering::Less);
        prop_assert_eq!(compare_names(&format!("Đ{}", tail), &format!("e{}", tail)), Ordering::Less);
    }
}
