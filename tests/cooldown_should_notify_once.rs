use stockpulse::application::usecases::{HandleClassificationUseCase, RunOnceUseCase};
use stockpulse::application::{
    AppError, AppResult, CooldownStore, CycleOutcome, NotificationGate, Notifier,
};
use stockpulse::domain::{
    CallToAction, Classification, CooldownPolicy, DatacenterStatus, MessageTemplates,
    Notification, STATUS_OUT_OF_STOCK, STATUS_PREORDER_ALLOWED, StockTarget,
};
use stockpulse::infrastructure::{
    fake_provider::FakeStockProvider, memory_store::InMemoryCooldownStore,
};

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use std::sync::{Arc, Mutex};

#[derive(Clone, Default)]
struct CountingNotifier {
    sent: Arc<Mutex<Vec<Notification>>>,
    fail: bool,
}

impl CountingNotifier {
    fn new() -> Self {
        Self::default()
    }
    fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }
    fn get(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
    fn last(&self) -> Notification {
        self.sent.lock().unwrap().last().cloned().unwrap()
    }
}

#[async_trait]
impl Notifier for CountingNotifier {
    async fn notify(&self, notification: &Notification) -> AppResult<()> {
        if self.fail {
            return Err(AppError::Notifier("chat not found".into()));
        }
        self.sent.lock().unwrap().push(notification.clone());
        Ok(())
    }
}

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 5, 4, 8, 0, 0).unwrap()
}

struct Harness {
    target: StockTarget,
    provider: FakeStockProvider,
    store: InMemoryCooldownStore,
    notifier: CountingNotifier,
    templates: MessageTemplates,
}

impl Harness {
    fn new(region: &str, status: &str) -> Self {
        Self {
            target: StockTarget::new("vps-2025-model1", region).unwrap(),
            provider: FakeStockProvider::new(vec![DatacenterStatus::new(region, status)]),
            store: InMemoryCooldownStore::new(),
            notifier: CountingNotifier::new(),
            templates: MessageTemplates::default(),
        }
    }

    async fn run_at(
        &self,
        now: DateTime<Utc>,
        notifier: Option<&dyn Notifier>,
    ) -> AppResult<CycleOutcome> {
        let run_once = RunOnceUseCase {
            target: &self.target,
            provider: &self.provider,
            handle_classification: HandleClassificationUseCase {
                target: &self.target,
                gate: NotificationGate {
                    store: &self.store,
                    policy: CooldownPolicy::default(),
                },
                notifier,
                templates: &self.templates,
                call_to_action: Some(CallToAction::resolve(None, None)),
            },
        };
        run_once.execute_at(now).await
    }

    async fn run(&self, now: DateTime<Utc>) -> AppResult<CycleOutcome> {
        self.run_at(now, Some(&self.notifier as &dyn Notifier)).await
    }
}

#[tokio::test]
async fn out_of_stock_clears_state_and_sends_nothing() {
    let h = Harness::new("WAW1", STATUS_OUT_OF_STOCK);
    h.store.write(t0() - Duration::hours(1)).await.unwrap();

    let outcome = h.run(t0()).await.unwrap();

    assert_eq!(outcome, CycleOutcome::NoStock);
    assert_eq!(h.notifier.get(), 0);
    assert_eq!(h.store.last_notified(), None);
}

#[tokio::test]
async fn preorder_notifies_once_per_cooldown_window() {
    let h = Harness::new("SGP1", STATUS_PREORDER_ALLOWED);

    // first sighting sends and records the time
    let outcome = h.run(t0()).await.unwrap();
    assert_eq!(outcome, CycleOutcome::Notified(Classification::Preorder));
    assert_eq!(h.notifier.get(), 1);
    assert_eq!(h.store.last_notified(), Some(t0()));
    let msg = h.notifier.last();
    assert!(msg.text.contains("vps-2025-model1"));
    assert!(msg.text.contains("SGP1"));

    // one hour later: still cooling down
    let outcome = h.run(t0() + Duration::hours(1)).await.unwrap();
    assert_eq!(
        outcome,
        CycleOutcome::CoolingDown {
            classification: Classification::Preorder,
            remaining: Duration::hours(11),
        }
    );
    assert_eq!(h.notifier.get(), 1);

    // thirteen hours later: sends again and moves the timestamp
    let later = t0() + Duration::hours(13);
    let outcome = h.run(later).await.unwrap();
    assert_eq!(outcome, CycleOutcome::Notified(Classification::Preorder));
    assert_eq!(h.notifier.get(), 2);
    assert_eq!(h.store.last_notified(), Some(later));
}

#[tokio::test]
async fn available_uses_default_template_and_button() {
    let h = Harness::new("SGP1", "available-now");

    let outcome = h.run(t0()).await.unwrap();

    assert_eq!(outcome, CycleOutcome::Notified(Classification::Available));
    let msg = h.notifier.last();
    assert_eq!(
        msg.text,
        "STOCK FOUND (Linux)!\n\nPlan: vps-2025-model1\nLocation: SGP1"
    );
    assert_eq!(msg.call_to_action, Some(CallToAction::resolve(None, None)));
}

#[tokio::test]
async fn stock_disappearing_resets_cooldown() {
    let h = Harness::new("SGP1", "available-now");
    h.run(t0()).await.unwrap();

    h.provider
        .set_entries(vec![DatacenterStatus::new("SGP1", STATUS_OUT_OF_STOCK)]);
    h.run(t0() + Duration::minutes(10)).await.unwrap();

    h.provider
        .set_entries(vec![DatacenterStatus::new("SGP1", "available-now")]);
    let outcome = h.run(t0() + Duration::minutes(20)).await.unwrap();

    assert_eq!(outcome, CycleOutcome::Notified(Classification::Available));
    assert_eq!(h.notifier.get(), 2);
}

#[tokio::test]
async fn fetch_failure_leaves_state_untouched() {
    let mut h = Harness::new("SGP1", "available-now");
    h.provider = FakeStockProvider::unreachable();
    h.store.write(t0() - Duration::hours(1)).await.unwrap();

    let err = h.run(t0()).await.unwrap_err();

    assert!(matches!(err, AppError::Fetch(_)));
    assert_eq!(h.notifier.get(), 0);
    assert_eq!(h.store.last_notified(), Some(t0() - Duration::hours(1)));
}

#[tokio::test]
async fn failed_send_is_not_recorded() {
    let h = Harness::new("SGP1", "available-now");
    let failing = CountingNotifier::failing();

    let outcome = h.run_at(t0(), Some(&failing as &dyn Notifier)).await.unwrap();

    assert!(matches!(
        outcome,
        CycleOutcome::SendFailed {
            classification: Classification::Available,
            ..
        }
    ));
    assert_eq!(h.store.last_notified(), None);

    // the next cycle retries right away
    let outcome = h.run(t0() + Duration::minutes(10)).await.unwrap();
    assert_eq!(outcome, CycleOutcome::Notified(Classification::Available));
}

#[tokio::test]
async fn missing_credentials_skip_send_without_recording() {
    let h = Harness::new("SGP1", STATUS_PREORDER_ALLOWED);

    let outcome = h.run_at(t0(), None).await.unwrap();

    assert_eq!(outcome, CycleOutcome::SendSkipped(Classification::Preorder));
    assert_eq!(h.store.last_notified(), None);
}

#[tokio::test]
async fn custom_templates_are_per_classification() {
    let mut h = Harness::new("SGP1", STATUS_PREORDER_ALLOWED);
    h.templates = MessageTemplates {
        available: Some("stock: {plan}/{region}".into()),
        preorder: Some("preorder: {plan}/{region}".into()),
    };

    h.run(t0()).await.unwrap();

    assert_eq!(h.notifier.last().text, "preorder: vps-2025-model1/SGP1");
}
