use snooker_scorer::ball::COLORS_IN_SEQUENCE;
use snooker_scorer::{
    Ball, MatchEvent, MatchSetup, MatchState, PerPlayer, Phase, Player, apply_event, snapshot,
};

fn best_of_five() -> MatchState {
    MatchState::new(MatchSetup {
        best_of_frames: 5,
        first_to_break: Player::Player1,
        ..MatchSetup::default()
    })
    .expect("valid setup")
}

fn run(state: &MatchState, events: &[MatchEvent]) -> MatchState {
    events
        .iter()
        .fold(state.clone(), |acc, &event| apply_event(&acc, event))
}

#[test]
fn opening_visit_miss_and_foul() {
    let state = best_of_five();

    let state = apply_event(&state, MatchEvent::Pot { ball: Ball::Red });
    assert_eq!(state.scores.player1, 1);
    assert_eq!(state.remaining_reds, 14);
    assert!(state.waiting_for_color_after_red);

    let state = apply_event(&state, MatchEvent::Pot { ball: Ball::Yellow });
    assert_eq!(state.scores.player1, 3);
    assert!(!state.waiting_for_color_after_red);

    let state = apply_event(&state, MatchEvent::EndTurn);
    assert_eq!(state.current_turn, Player::Player2);
    assert_eq!(state.current_break, 0);

    let state = apply_event(&state, MatchEvent::Foul { points: 4 });
    assert_eq!(state.scores.player1, 7);
    assert_eq!(state.current_turn, Player::Player1);
    assert!(state.free_ball_available);
}

#[test]
fn reds_exhausted_then_colours_cleared_in_order() {
    let mut events = Vec::new();
    for _ in 0..15 {
        events.push(MatchEvent::Pot { ball: Ball::Red });
        events.push(MatchEvent::Pot { ball: Ball::Green });
    }
    let state = run(&best_of_five(), &events);
    assert_eq!(state.phase, Phase::ColorsSequence);
    assert_eq!(state.next_color_index, 0);

    let mut state = state;
    for (index, ball) in COLORS_IN_SEQUENCE.into_iter().enumerate() {
        state = apply_event(&state, MatchEvent::Pot { ball });
        if index < 5 {
            assert_eq!(state.next_color_index as usize, index + 1);
        }
    }

    assert_eq!(state.phase, Phase::FrameOver);
    assert_eq!(state.frame_winner, Some(Player::Player1));
    assert_eq!(state.frames_won, PerPlayer::new(1, 0));
    assert_eq!(state.frame_history.len(), 1);
    assert_eq!(state.frame_history[0].frame_number, 1);
    assert_eq!(state.frame_history[0].scores.player1, 15 * 4 + 27);
}

#[test]
fn concession_records_scores_at_the_moment() {
    let state = run(
        &best_of_five(),
        &[
            MatchEvent::Pot { ball: Ball::Red },
            MatchEvent::Pot { ball: Ball::Black },
            MatchEvent::EndTurn,
            MatchEvent::PotReds { count: 2 },
            MatchEvent::Pot { ball: Ball::Blue },
            MatchEvent::ConcedeFrame,
        ],
    );

    assert_eq!(state.frame_winner, Some(Player::Player1));
    assert_eq!(state.frames_won, PerPlayer::new(1, 0));
    let record = state.frame_history[0];
    assert_eq!(record.scores, PerPlayer::new(8, 7));
    assert_eq!(record.highest_breaks, PerPlayer::new(8, 7));
    assert_eq!(record.winner, Some(Player::Player1));
}

#[test]
fn frame_numbers_stay_contiguous_across_a_match() {
    let mut state = best_of_five();
    let mut frames = 0;
    while state.match_winner.is_none() {
        state = run(
            &state,
            &[
                MatchEvent::ConcedeFrame,
                MatchEvent::StartNextFrame { breaker: None },
            ],
        );
        frames += 1;
        assert!(frames <= 5, "match must finish within five frames");
    }

    let numbers: Vec<u32> = state.frame_history.iter().map(|f| f.frame_number).collect();
    let expected: Vec<u32> = (1..=numbers.len() as u32).collect();
    assert_eq!(numbers, expected);
    assert_eq!(state.phase, Phase::MatchOver);
    assert_eq!(
        state.frames_won[state.match_winner.unwrap()],
        state.frames_to_win()
    );
}

#[test]
fn snapshot_resume_continues_identically() {
    let played = run(
        &best_of_five(),
        &[
            MatchEvent::PotReds { count: 3 },
            MatchEvent::Pot { ball: Ball::Pink },
            MatchEvent::FoulOnPot { ball: Ball::Black },
        ],
    );
    let bytes = snapshot::encode(&played).expect("encode");
    let resumed = snapshot::decode(&bytes).expect("decode");

    let tail = [
        MatchEvent::StartFreeBall,
        MatchEvent::Pot { ball: Ball::Brown },
        MatchEvent::Pot { ball: Ball::Black },
        MatchEvent::ConcedeFrame,
    ];
    assert_eq!(run(&played, &tail), run(&resumed, &tail));
}

#[test]
fn events_deserialize_from_tagged_json() {
    let event: MatchEvent = serde_json::from_str(r#"{"type":"pot","ball":"pink"}"#).unwrap();
    assert_eq!(event, MatchEvent::Pot { ball: Ball::Pink });

    let event: MatchEvent = serde_json::from_str(r#"{"type":"start_next_frame"}"#).unwrap();
    assert_eq!(event, MatchEvent::StartNextFrame { breaker: None });

    let event: MatchEvent = serde_json::from_str(r#"{"type":"foul","points":6}"#).unwrap();
    assert_eq!(event, MatchEvent::Foul { points: 6 });
}
