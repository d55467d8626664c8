// Broker adapters: road metrics in, notifications and gate commands out.

use crate::error::Result;
use crate::global_variables::{
    AMQP_URL, QUEUE_GATE_COMMANDS, QUEUE_ROAD_METRICS, QUEUE_ROAD_NOTIFICATIONS,
};
use crate::monitoring::MonitorOutcome;
use crate::shared_data::{current_timestamp, RoadMetrics};
use amiquip::{
    Connection, ConsumerMessage, ConsumerOptions, Exchange, Publish, QueueDeclareOptions,
};
use serde::Serialize;
use tokio::sync::mpsc;
use tokio::task;

// Accepts either a JSON array of readings or a single reading. The first
// non-whitespace byte picks the shape, so element errors surface as they are.
pub fn decode_metrics_batch(body: &[u8]) -> Result<Vec<RoadMetrics>> {
    let is_array = body
        .iter()
        .find(|b| !b.is_ascii_whitespace())
        .is_some_and(|&b| b == b'[');
    if is_array {
        Ok(serde_json::from_slice::<Vec<RoadMetrics>>(body)?)
    } else {
        Ok(vec![serde_json::from_slice::<RoadMetrics>(body)?])
    }
}

fn encode_message<T: Serialize + ?Sized>(record: &T) -> Result<String> {
    Ok(serde_json::to_string(record)?)
}

// An unencodable record fails the publish rather than being skipped.
fn publish_json<T: Serialize + ?Sized>(
    exchange: &Exchange,
    queue: &str,
    record: &T,
) -> Result<()> {
    let payload = encode_message(record)?;
    exchange.publish(Publish::new(payload.as_bytes(), queue))?;
    Ok(())
}

/// Publishes every notification and gate command in the outcomes.
///
/// Stops at the first message that cannot be encoded or sent.
pub fn publish_outcomes(outcomes: &[MonitorOutcome]) -> Result<()> {
    let mut connection = Connection::insecure_open(AMQP_URL)?;
    let channel = connection.open_channel(None)?;
    let exchange = Exchange::direct(&channel);
    channel.queue_declare(QUEUE_ROAD_NOTIFICATIONS, QueueDeclareOptions::default())?;
    channel.queue_declare(QUEUE_GATE_COMMANDS, QueueDeclareOptions::default())?;

    for report in outcomes.iter().filter_map(MonitorOutcome::report) {
        if let Some(command) = report.gate_command() {
            publish_json(&exchange, QUEUE_GATE_COMMANDS, &command)?;
            log::info!("[Publisher] Gate command sent: {:?}", command);
        }
        for event in &report.events {
            publish_json(&exchange, QUEUE_ROAD_NOTIFICATIONS, event)?;
        }
    }
    connection.close()?;
    Ok(())
}

/// Publishes one batch of readings on the metrics queue.
pub fn publish_metrics(batch: &[RoadMetrics]) -> Result<()> {
    let mut connection = Connection::insecure_open(AMQP_URL)?;
    let channel = connection.open_channel(None)?;
    let exchange = Exchange::direct(&channel);
    channel.queue_declare(QUEUE_ROAD_METRICS, QueueDeclareOptions::default())?;
    publish_json(&exchange, QUEUE_ROAD_METRICS, batch)?;
    connection.close()?;
    Ok(())
}

// Consumes the metrics queue and forwards each decoded batch to the monitor loop.
pub async fn listen_road_metrics(tx: mpsc::Sender<Vec<RoadMetrics>>) -> Result<()> {
    let handle = task::spawn_blocking(move || -> Result<()> {
        let mut connection = Connection::insecure_open(AMQP_URL)?;
        let channel = connection.open_channel(None)?;
        let queue = channel.queue_declare(QUEUE_ROAD_METRICS, QueueDeclareOptions::default())?;
        let consumer = queue.consume(ConsumerOptions::default())?;
        log::info!("[Monitor] Waiting for readings on '{}'...", QUEUE_ROAD_METRICS);

        for message in consumer.receiver() {
            match message {
                ConsumerMessage::Delivery(delivery) => {
                    match decode_metrics_batch(&delivery.body) {
                        Ok(batch) => {
                            if tx.blocking_send(batch).is_err() {
                                log::warn!("[Monitor] Monitor loop gone, stopping consumer");
                                consumer.ack(delivery)?;
                                break;
                            }
                        }
                        Err(e) => log::warn!(
                            "[Monitor] Dropping undecodable reading at {}: {}",
                            current_timestamp(),
                            e
                        ),
                    }
                    consumer.ack(delivery)?;
                }
                other => {
                    log::info!("[Monitor] Metrics consumer ended: {:?}", other);
                    break;
                }
            }
        }
        connection.close()?;
        Ok(())
    });

    match handle.await {
        Ok(result) => result,
        Err(e) if e.is_panic() => std::panic::resume_unwind(e.into_panic()),
        Err(e) => {
            log::warn!("[Monitor] Metrics consumer cancelled: {}", e);
            Ok(())
        }
    }
}
