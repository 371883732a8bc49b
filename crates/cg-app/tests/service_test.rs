//! End-to-end tests for the guard service over an in-memory clipboard.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::anyhow;
use tokio::sync::mpsc;
use tokio::time::timeout;

use cg_app::{GuardConfig, GuardController, GuardService};
use cg_core::ports::LocalClipboardPort;
use cg_core::rules::RuleSet;
use cg_core::state::MonitorState;
use cg_core::GuardEvent;

/// In-memory stand-in for the system clipboard.
#[derive(Clone, Default)]
struct MemClipboard {
    text: Arc<Mutex<String>>,
    fail_reads: Arc<AtomicBool>,
}

impl MemClipboard {
    fn set(&self, text: &str) {
        *self.text.lock().unwrap() = text.to_string();
    }

    fn get(&self) -> String {
        self.text.lock().unwrap().clone()
    }

    fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }
}

impl LocalClipboardPort for MemClipboard {
    fn read_text(&self) -> anyhow::Result<String> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(anyhow!("clipboard unavailable"));
        }
        Ok(self.get())
    }

    fn write_text(&self, text: &str) -> anyhow::Result<()> {
        self.set(text);
        Ok(())
    }
}

struct Harness {
    clipboard: MemClipboard,
    controller: GuardController,
    events: mpsc::Receiver<GuardEvent>,
    service: tokio::task::JoinHandle<()>,
}

fn start_guard(rules: RuleSet, start_paused: bool) -> Harness {
    let clipboard = MemClipboard::default();
    let config = GuardConfig {
        poll_interval: Duration::from_millis(10),
        io_timeout: Duration::from_millis(500),
        start_paused,
    };
    let (service, controller, events) =
        GuardService::new(Arc::new(clipboard.clone()), rules, config);
    let service = tokio::spawn(service.run());
    Harness {
        clipboard,
        controller,
        events,
        service,
    }
}

/// Wait for the next event matching `pred`, skipping unrelated ones.
async fn wait_for_event(
    events: &mut mpsc::Receiver<GuardEvent>,
    pred: impl Fn(&GuardEvent) -> bool,
) -> GuardEvent {
    timeout(Duration::from_secs(3), async {
        loop {
            let event = events.recv().await.expect("event channel closed");
            if pred(&event) {
                return event;
            }
        }
    })
    .await
    .expect("timed out waiting for event")
}

/// Drain events for `window` and assert none of them is a `Masked` fact.
async fn assert_no_masking_within(events: &mut mpsc::Receiver<GuardEvent>, window: Duration) {
    let deadline = tokio::time::Instant::now() + window;
    loop {
        let remaining = deadline.saturating_duration_since(tokio::time::Instant::now());
        if remaining.is_zero() {
            return;
        }
        match timeout(remaining, events.recv()).await {
            Ok(Some(GuardEvent::Masked { rules, .. })) => {
                panic!("unexpected masking event: {rules:?}");
            }
            Ok(Some(_)) => continue,
            Ok(None) | Err(_) => return,
        }
    }
}

#[tokio::test]
async fn external_change_is_masked_and_written_back() {
    let mut guard = start_guard(RuleSet::builtin(), false);

    tokio::time::sleep(Duration::from_millis(50)).await;
    guard.clipboard.set("contact alice@example.com today");

    let event = wait_for_event(&mut guard.events, |e| matches!(e, GuardEvent::Masked { .. })).await;
    let GuardEvent::Masked { rules, .. } = event else {
        unreachable!()
    };
    assert_eq!(rules, ["Email"]);
    assert_eq!(guard.clipboard.get(), "contact [REDACTED_EMAIL] today");
    assert!(guard.controller.has_restorable_content());
}

#[tokio::test]
async fn self_write_does_not_trigger_a_second_pass() {
    let mut guard = start_guard(RuleSet::builtin(), false);

    tokio::time::sleep(Duration::from_millis(50)).await;
    guard.clipboard.set("ssn is 123-45-6789, be careful");
    wait_for_event(&mut guard.events, |e| matches!(e, GuardEvent::Masked { .. })).await;

    // Give the poller plenty of ticks to (incorrectly) reprocess its own
    // write; the masked text must stay put and no second event may fire.
    assert_no_masking_within(&mut guard.events, Duration::from_millis(150)).await;
    assert_eq!(guard.clipboard.get(), "ssn is [REDACTED_SSN], be careful");
}

#[tokio::test]
async fn restore_round_trips_to_the_exact_original() {
    let original = "card 4111-1111-1111-1111 exp 12/28";
    let mut guard = start_guard(RuleSet::builtin(), false);

    tokio::time::sleep(Duration::from_millis(50)).await;
    guard.clipboard.set(original);
    wait_for_event(&mut guard.events, |e| matches!(e, GuardEvent::Masked { .. })).await;
    assert_ne!(guard.clipboard.get(), original);

    guard.controller.restore_last().await.unwrap();
    wait_for_event(&mut guard.events, |e| {
        matches!(e, GuardEvent::Restored { .. })
    })
    .await;
    assert_eq!(guard.clipboard.get(), original);

    // The slot survives a restore, so restoring again still works.
    guard.controller.restore_last().await.unwrap();
    wait_for_event(&mut guard.events, |e| {
        matches!(e, GuardEvent::Restored { .. })
    })
    .await;
    assert_eq!(guard.clipboard.get(), original);
}

#[tokio::test]
async fn restore_with_empty_history_is_a_no_op() {
    let mut guard = start_guard(RuleSet::builtin(), false);
    guard.clipboard.set("plain text, nothing sensitive");

    guard.controller.restore_last().await.unwrap();
    wait_for_event(&mut guard.events, |e| {
        matches!(e, GuardEvent::Warning { .. })
    })
    .await;

    assert_eq!(guard.clipboard.get(), "plain text, nothing sensitive");
    assert!(!guard.controller.has_restorable_content());
}

#[tokio::test]
async fn clean_last_link_rewrites_the_current_clipboard() {
    let mut guard = start_guard(RuleSet::builtin(), false);

    tokio::time::sleep(Duration::from_millis(50)).await;
    guard
        .clipboard
        .set("https://example.com/page?utm_source=x&id=5");

    guard.controller.clean_last_link().await.unwrap();
    let event = wait_for_event(&mut guard.events, |e| {
        matches!(e, GuardEvent::LinkCleaned { .. })
    })
    .await;
    let GuardEvent::LinkCleaned { cleaned, .. } = event else {
        unreachable!()
    };
    assert_eq!(cleaned, "https://example.com/page?id=5");
    assert_eq!(guard.clipboard.get(), "https://example.com/page?id=5");
    assert!(guard.controller.has_restorable_link());

    // The guard's own write must not be reprocessed.
    assert_no_masking_within(&mut guard.events, Duration::from_millis(100)).await;
}

#[tokio::test]
async fn clean_last_link_on_a_clean_url_reports_unchanged() {
    let mut guard = start_guard(RuleSet::builtin(), false);
    guard.clipboard.set("https://example.com/page?id=5");

    guard.controller.clean_last_link().await.unwrap();
    wait_for_event(&mut guard.events, |e| {
        matches!(e, GuardEvent::LinkUnchanged)
    })
    .await;
    assert!(!guard.controller.has_restorable_link());
}

#[tokio::test]
async fn changes_made_while_paused_are_dropped_on_resume() {
    let mut guard = start_guard(RuleSet::builtin(), false);

    tokio::time::sleep(Duration::from_millis(50)).await;
    guard.controller.pause().await.unwrap();
    guard
        .controller
        .wait_for_status(|s| s.state == MonitorState::Paused)
        .await
        .unwrap();

    guard.clipboard.set("leaked ssn 123-45-6789 while paused");
    tokio::time::sleep(Duration::from_millis(80)).await;

    guard.controller.resume().await.unwrap();
    guard
        .controller
        .wait_for_status(|s| s.state == MonitorState::Running)
        .await
        .unwrap();

    // The change that happened while paused is the baseline now.
    assert_no_masking_within(&mut guard.events, Duration::from_millis(120)).await;
    assert_eq!(
        guard.clipboard.get(),
        "leaked ssn 123-45-6789 while paused"
    );

    // New changes after resume are processed normally.
    guard.clipboard.set("fresh ssn 987-65-4321 after resume");
    wait_for_event(&mut guard.events, |e| matches!(e, GuardEvent::Masked { .. })).await;
    assert_eq!(
        guard.clipboard.get(),
        "fresh ssn [REDACTED_SSN] after resume"
    );
}

#[tokio::test]
async fn starting_paused_defers_all_processing() {
    let mut guard = start_guard(RuleSet::builtin(), true);
    assert_eq!(guard.controller.state(), MonitorState::Paused);

    guard.clipboard.set("ssn 123-45-6789 copied early");
    assert_no_masking_within(&mut guard.events, Duration::from_millis(80)).await;

    guard.controller.resume().await.unwrap();
    guard
        .controller
        .wait_for_status(|s| s.state == MonitorState::Running)
        .await
        .unwrap();

    // Content present at resume time becomes the baseline, untouched.
    assert_no_masking_within(&mut guard.events, Duration::from_millis(80)).await;
    assert_eq!(guard.clipboard.get(), "ssn 123-45-6789 copied early");

    guard.clipboard.set("mail bob@example.com please");
    wait_for_event(&mut guard.events, |e| matches!(e, GuardEvent::Masked { .. })).await;
    assert_eq!(guard.clipboard.get(), "mail [REDACTED_EMAIL] please");
}

#[tokio::test]
async fn rule_set_swap_applies_to_the_next_change() {
    let mut guard = start_guard(RuleSet::builtin(), false);

    tokio::time::sleep(Duration::from_millis(50)).await;

    let mut rules = RuleSet::builtin();
    for name in ["Email", "Phone", "IPv4", "CreditCard", "SSN"] {
        rules.set_enabled(name, false).unwrap();
    }
    rules
        .add_custom("Ticket", r"TICKET-\d+", "[REDACTED_TICKET]")
        .unwrap();
    guard.controller.update_rules(rules.to_configs()).await.unwrap();
    // Let the service drain the command before the next change arrives.
    tokio::time::sleep(Duration::from_millis(30)).await;

    guard.clipboard.set("see TICKET-1234 or mail alice@example.com");
    let event = wait_for_event(&mut guard.events, |e| matches!(e, GuardEvent::Masked { .. })).await;
    let GuardEvent::Masked { rules, .. } = event else {
        unreachable!()
    };
    assert_eq!(rules, ["Ticket"]);
    assert_eq!(
        guard.clipboard.get(),
        "see [REDACTED_TICKET] or mail alice@example.com"
    );
}

#[tokio::test]
async fn read_failures_are_retried_not_fatal() {
    let mut guard = start_guard(RuleSet::builtin(), false);

    tokio::time::sleep(Duration::from_millis(50)).await;
    guard.clipboard.fail_reads(true);
    guard.clipboard.set("host 10.0.0.1 credentials");
    tokio::time::sleep(Duration::from_millis(80)).await;

    // Loop is still alive; once the clipboard recovers the change lands.
    guard.clipboard.fail_reads(false);
    wait_for_event(&mut guard.events, |e| matches!(e, GuardEvent::Masked { .. })).await;
    assert_eq!(guard.clipboard.get(), "host [REDACTED_IP] credentials");
}

#[tokio::test]
async fn shutdown_is_terminal() {
    let mut guard = start_guard(RuleSet::builtin(), false);

    guard.controller.shutdown().await.unwrap();
    wait_for_event(&mut guard.events, |e| {
        matches!(
            e,
            GuardEvent::MonitorStateChanged {
                state: MonitorState::Stopped
            }
        )
    })
    .await;

    guard.service.await.unwrap();
    assert_eq!(guard.controller.state(), MonitorState::Stopped);
    assert!(guard.controller.pause().await.is_err());
}
