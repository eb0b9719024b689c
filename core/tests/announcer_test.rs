mod common;

use blockspeak_core::{Priority, SpeechSettings};
use common::{advance_ms, start, FakeOutput, OutputEvent};

#[tokio::test(start_paused = true)]
async fn test_first_announcement_speaks_immediately() {
    let out = FakeOutput::new();
    let announcer = start(&out);

    announcer.announce("repeat 10 times", Priority::Normal);
    let snap = announcer.snapshot().await;

    assert_eq!(out.spoken(), vec!["repeat 10 times"]);
    assert_eq!(snap.speaking.as_deref(), Some("repeat 10 times"));
    assert_eq!(snap.pending, None);
    assert!(snap.enabled && snap.available);
}

#[tokio::test(start_paused = true)]
async fn test_empty_text_is_ignored() {
    let out = FakeOutput::new();
    let announcer = start(&out);

    announcer.announce("   ", Priority::High);
    announcer.force_announce("");
    announcer.snapshot().await;

    assert!(out.events().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_pending_slot_keeps_only_newest() {
    let out = FakeOutput::new();
    let announcer = start(&out);

    announcer.announce("a", Priority::Normal);
    announcer.announce("b", Priority::Normal);
    announcer.announce("c", Priority::Normal);
    let snap = announcer.snapshot().await;
    assert_eq!(snap.speaking.as_deref(), Some("a"));
    assert_eq!(snap.pending.as_deref(), Some("c"));

    out.finish();
    let snap = announcer.snapshot().await;
    assert_eq!(snap.speaking.as_deref(), Some("c"));
    assert_eq!(snap.pending, None);
    assert_eq!(out.spoken(), vec!["a", "c"]);
}

#[tokio::test(start_paused = true)]
async fn test_grace_period_then_interrupt() {
    let out = FakeOutput::new();
    let announcer = start(&out);

    announcer.announce("a long description", Priority::Normal);
    announcer.announce("next", Priority::Normal);

    // min speak time plus interruption delay
    advance_ms(790).await;
    let snap = announcer.snapshot().await;
    assert_eq!(snap.pending.as_deref(), Some("next"));
    assert_eq!(out.spoken(), vec!["a long description"]);

    advance_ms(100).await;
    announcer.snapshot().await;
    assert_eq!(
        out.events(),
        vec![
            OutputEvent::Speak("a long description".into()),
            OutputEvent::Cancel,
            OutputEvent::Speak("next".into()),
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn test_normal_after_min_speak_time_preempts() {
    let out = FakeOutput::new();
    let announcer = start(&out);

    announcer.announce("first", Priority::Normal);
    advance_ms(600).await;
    announcer.announce("second", Priority::Normal);
    let snap = announcer.snapshot().await;
    assert_eq!(snap.speaking.as_deref(), Some("second"));
    assert_eq!(
        out.events(),
        vec![OutputEvent::Speak("first".into()), OutputEvent::Cancel]
    );

    advance_ms(60).await;
    announcer.snapshot().await;
    assert_eq!(out.spoken(), vec!["first", "second"]);
}

#[tokio::test(start_paused = true)]
async fn test_high_priority_preempts_after_threshold() {
    let out = FakeOutput::new();
    let announcer = start(&out);

    announcer.announce("if do", Priority::Normal);
    advance_ms(250).await;
    announcer.announce("Workspace", Priority::High);
    announcer.snapshot().await;
    // output is only restarted after the settle delay
    assert_eq!(out.spoken(), vec!["if do"]);

    advance_ms(60).await;
    let snap = announcer.snapshot().await;
    assert_eq!(snap.speaking.as_deref(), Some("Workspace"));
    assert_eq!(
        out.events(),
        vec![
            OutputEvent::Speak("if do".into()),
            OutputEvent::Cancel,
            OutputEvent::Speak("Workspace".into()),
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn test_high_priority_within_threshold_waits() {
    let out = FakeOutput::new();
    let announcer = start(&out);

    announcer.announce("a", Priority::Normal);
    advance_ms(100).await;
    announcer.announce("h", Priority::High);
    // a queued high request is not displaced by normal chatter
    announcer.announce("n", Priority::Normal);
    let snap = announcer.snapshot().await;
    assert_eq!(snap.speaking.as_deref(), Some("a"));
    assert_eq!(snap.pending.as_deref(), Some("h"));

    advance_ms(800).await;
    announcer.snapshot().await;
    assert_eq!(out.spoken(), vec!["a", "h"]);
}

#[tokio::test(start_paused = true)]
async fn test_high_priority_discards_pending_normal() {
    let out = FakeOutput::new();
    let announcer = start(&out);

    announcer.announce("a", Priority::Normal);
    announcer.announce("stale", Priority::Normal);
    advance_ms(300).await;
    announcer.announce("h", Priority::High);
    advance_ms(2000).await;
    out.finish();
    advance_ms(2000).await;

    let snap = announcer.snapshot().await;
    assert_eq!(out.spoken(), vec!["a", "h"]);
    assert_eq!(snap.speaking, None);
    assert_eq!(snap.pending, None);
}

#[tokio::test(start_paused = true)]
async fn test_force_announce_wins() {
    let out = FakeOutput::new();
    let announcer = start(&out);

    announcer.announce("a", Priority::Normal);
    announcer.announce("b", Priority::Normal);
    announcer.force_announce("Settings applied");

    advance_ms(50).await;
    let snap = announcer.snapshot().await;
    assert_eq!(snap.pending, None);
    assert_eq!(out.spoken(), vec!["a"]);

    advance_ms(60).await;
    announcer.snapshot().await;
    assert_eq!(
        out.events(),
        vec![
            OutputEvent::Speak("a".into()),
            OutputEvent::Cancel,
            OutputEvent::Speak("Settings applied".into()),
        ]
    );

    advance_ms(5000).await;
    assert_eq!(out.spoken(), vec!["a", "Settings applied"]);
}

#[tokio::test(start_paused = true)]
async fn test_at_most_one_active_session() {
    let out = FakeOutput::new();
    let announcer = start(&out);

    for i in 0..20 {
        let priority = if i % 3 == 0 {
            Priority::High
        } else {
            Priority::Normal
        };
        announcer.announce(format!("item {}", i), priority);
        advance_ms(70).await;
    }
    advance_ms(3000).await;
    announcer.snapshot().await;

    // every speak after the first is preceded by a cancel or an end
    let mut active = 0i32;
    for event in out.events() {
        match event {
            OutputEvent::Speak(_) => {
                assert_eq!(active, 0, "two sessions overlapped");
                active = 1;
            }
            OutputEvent::Cancel => active = 0,
        }
    }
}

#[tokio::test(start_paused = true)]
async fn test_disabled_is_silent_until_reenabled() {
    let out = FakeOutput::new();
    let announcer = start(&out);

    announcer.announce("a", Priority::Normal);
    announcer.snapshot().await;
    announcer.set_enabled(false);
    announcer.announce("muted", Priority::High);
    announcer.force_announce("muted too");
    let snap = announcer.snapshot().await;
    assert!(!snap.enabled);
    assert_eq!(snap.speaking, None);
    assert_eq!(
        out.events(),
        vec![OutputEvent::Speak("a".into()), OutputEvent::Cancel]
    );

    announcer.set_enabled(true);
    announcer.announce("back", Priority::Normal);
    announcer.snapshot().await;
    assert_eq!(out.spoken(), vec!["a", "back"]);
}

#[tokio::test(start_paused = true)]
async fn test_unavailable_output_is_a_no_op() {
    let out = FakeOutput::unavailable();
    let announcer = start(&out);

    announcer.announce("a", Priority::High);
    announcer.force_announce("b");
    announcer.cancel();
    announcer.configure(SpeechSettings::default());
    let snap = announcer.snapshot().await;

    assert!(!snap.available);
    assert_eq!(snap.speaking, None);
    assert!(out.events().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_device_error_moves_on_to_pending() {
    let out = FakeOutput::new();
    let announcer = start(&out);

    announcer.announce("a", Priority::Normal);
    announcer.announce("b", Priority::Normal);
    announcer.snapshot().await;
    out.fail("audio device lost");

    let snap = announcer.snapshot().await;
    assert_eq!(snap.speaking.as_deref(), Some("b"));
    assert_eq!(out.spoken(), vec!["a", "b"]);
}

#[tokio::test(start_paused = true)]
async fn test_speak_failure_drops_session() {
    let out = FakeOutput::new();
    let announcer = start(&out);

    out.fail_next_speak();
    announcer.announce("lost", Priority::Normal);
    let snap = announcer.snapshot().await;
    assert_eq!(snap.speaking, None);

    announcer.announce("heard", Priority::Normal);
    announcer.snapshot().await;
    assert_eq!(out.spoken(), vec!["heard"]);
}

#[tokio::test(start_paused = true)]
async fn test_stale_end_signal_is_ignored() {
    let out = FakeOutput::new();
    let announcer = start(&out);

    announcer.announce("old", Priority::Normal);
    advance_ms(300).await;
    announcer.announce("new", Priority::High);
    advance_ms(60).await;
    announcer.announce("queued", Priority::Normal);

    // the cancelled session reports late
    out.reporter(0).ended();
    let snap = announcer.snapshot().await;
    assert_eq!(snap.speaking.as_deref(), Some("new"));
    assert_eq!(snap.pending.as_deref(), Some("queued"));
}

#[tokio::test(start_paused = true)]
async fn test_cancel_clears_everything() {
    let out = FakeOutput::new();
    let announcer = start(&out);

    announcer.announce("a", Priority::Normal);
    announcer.announce("b", Priority::Normal);
    announcer.cancel();
    advance_ms(2000).await;
    let snap = announcer.snapshot().await;

    assert_eq!(snap.speaking, None);
    assert_eq!(snap.pending, None);
    assert_eq!(
        out.events(),
        vec![OutputEvent::Speak("a".into()), OutputEvent::Cancel]
    );
}

#[tokio::test(start_paused = true)]
async fn test_configure_applies_to_next_utterance() {
    let out = FakeOutput::new();
    let announcer = start(&out);

    announcer.announce("before", Priority::Normal);
    announcer.snapshot().await;
    announcer.configure(SpeechSettings {
        rate: 25.0,
        volume: 0.5,
        ..Default::default()
    });
    out.finish();
    announcer.announce("after", Priority::Normal);
    announcer.snapshot().await;

    let used = out.settings_used();
    assert_eq!(used.len(), 2);
    assert_eq!(used[0].rate, 1.0);
    assert_eq!(used[1].rate, 10.0);
    assert_eq!(used[1].volume, 0.5);
}
