//! Vaccination reminder dispatch
//!
//! Scans health records due within the due-soon window, classifies each
//! against today and pushes a reminder for overdue and due-soon records.
//! `reminder_log` gates delivery to once per record per day; a claim whose
//! delivery fails is released so a later pass can retry it.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{Local, NaiveDate};
use tokio::{task::JoinHandle, time};
use tracing::{error, info};
use uuid::Uuid;

use crate::{
    configuration::{AppState, State},
    error::Error,
    model::Due_Record,
    push,
    types::PushPayload,
    vaccination::{self, VaccinationStatus, DUE_SOON_DAYS},
};

#[derive(Debug, Default)]
pub struct ReminderReport {
    pub scanned: usize,
    pub reminded: usize,
    pub already_reminded: usize,
    pub failed: usize,
    pub deliveries: Vec<JoinHandle<()>>,
}

/// Where a reminder pass records its daily claims and sends pushes.
#[async_trait]
pub trait ReminderSink: Send + Sync {
    /// `true` only for the first claim of a record on `day`.
    async fn claim(&self, record_id: Uuid, day: NaiveDate) -> Result<bool, Error>;

    async fn release(&self, record_id: Uuid, day: NaiveDate) -> Result<(), Error>;

    async fn deliver(
        &self,
        user_id: Uuid,
        payload: PushPayload,
    ) -> Result<Vec<JoinHandle<()>>, Error>;
}

#[async_trait]
impl ReminderSink for AppState<State> {
    async fn claim(&self, record_id: Uuid, day: NaiveDate) -> Result<bool, Error> {
        Ok(self.database.reminder_log.try_claim(record_id, day).await?)
    }

    async fn release(&self, record_id: Uuid, day: NaiveDate) -> Result<(), Error> {
        self.database.reminder_log.release(record_id, day).await?;
        Ok(())
    }

    async fn deliver(
        &self,
        user_id: Uuid,
        payload: PushPayload,
    ) -> Result<Vec<JoinHandle<()>>, Error> {
        push::send(self.clone(), user_id, payload).await
    }
}

pub fn reminder_payload(
    record: &Due_Record,
    status: &VaccinationStatus,
) -> PushPayload {
    PushPayload {
        title: format!("{}: {}", record.pet_name, record.title),
        body: status.message.to_owned(),
        tag: Some(format!("health-record-{}", record.id)),
        url: Some(format!("/health?record={}", record.id)),
        icon: None,
    }
}

pub async fn dispatch(
    app_state: AppState<State>,
    today: NaiveDate,
    dry_run: bool,
) -> Result<ReminderReport, Error> {
    let until = today + chrono::Duration::days(DUE_SOON_DAYS);
    let records = app_state.database.health_record.get_due(until).await?;

    let report = remind(&app_state, records, today, dry_run).await;

    info!(
        "Reminder pass: scanned {}, reminded {}, already reminded {}, failed {}",
        report.scanned, report.reminded, report.already_reminded, report.failed
    );

    Ok(report)
}

/// One pass over `records`. A failing record is logged and skipped; it
/// never stops the rest of the pass.
pub async fn remind<S>(
    sink: &S,
    records: Vec<Due_Record>,
    today: NaiveDate,
    dry_run: bool,
) -> ReminderReport
where
    S: ReminderSink + ?Sized,
{
    let mut report = ReminderReport {
        scanned: records.len(),
        ..Default::default()
    };

    for record in records {
        let status = vaccination::classify_at(Some(record.next_due_date), today);

        if !status.status.needs_reminder() {
            continue;
        }

        if dry_run {
            info!(
                "Would remind user {} about {} ({})",
                record.user_id, record.title, status.message
            );
            report.reminded += 1;
            continue;
        }

        let claimed = match sink.claim(record.id, today).await {
            Ok(claimed) => claimed,
            Err(e) => {
                error!("Claiming reminder for record {} failed: {}", record.id, e);
                report.failed += 1;
                continue;
            },
        };

        if !claimed {
            report.already_reminded += 1;
            continue;
        }

        let payload = reminder_payload(&record, &status);

        match sink.deliver(record.user_id, payload).await {
            Ok(handles) => {
                report.reminded += 1;
                report.deliveries.extend(handles);
            },
            Err(e) => {
                error!("Reminder for record {} failed: {}", record.id, e);
                report.failed += 1;

                if let Err(e) = sink.release(record.id, today).await {
                    error!(
                        "Releasing reminder claim for record {} failed: {}",
                        record.id, e
                    );
                }
            },
        }
    }

    report
}

pub async fn reminder_task(app_state: AppState<State>) -> Result<(), Error> {
    if !app_state.config.enable_reminders {
        return Ok(());
    }

    let hours = app_state.config.reminder_interval;
    let mut interval = time::interval(Duration::from_secs(hours * 60 * 60));

    let task: JoinHandle<Result<(), Error>> = tokio::spawn(async move {
        loop {
            interval.tick().await;
            let today = Local::now().date_naive();
            if let Err(e) = dispatch(app_state.clone(), today, false).await {
                error!("Reminder task error {}", e);
            };
        }
    });

    task.await?
}
