//! Producer-to-consumer flow over the queue boundary, with mock transport.

use std::sync::Arc;
use std::time::Duration;

use scrapeflow_core::application::{shutdown_channel, ConsumerLoop, ProducerLoop};
use scrapeflow_core::port::fetcher::mocks::MockPageFetcher;
use scrapeflow_core::port::queue::mocks::MockWorkQueue;

const TOPIC: &str = "scrape-requests";

/// Work items published by a producer reach a consumer's fetcher
#[tokio::test]
async fn produced_items_are_fetched() {
    // Producer side: publish for a short while
    let producer_queue = Arc::new(MockWorkQueue::new());
    let producer = ProducerLoop::new(producer_queue.clone(), TOPIC, "https://example.org");
    let (producer_tx, producer_rx) = shutdown_channel();
    let producer_task = tokio::spawn(async move { producer.run(producer_rx).await });

    tokio::time::sleep(Duration::from_millis(50)).await;
    producer_tx.shutdown();
    producer_task.await.unwrap().unwrap();

    let published = producer_queue.published();
    assert!(!published.is_empty());

    // Consumer side: feed the published payloads through the broker mock
    let consumer_queue = Arc::new(MockWorkQueue::new());
    for (topic, payload) in &published {
        assert_eq!(topic, TOPIC);
        consumer_queue.inject(payload.clone());
    }

    let fetcher = Arc::new(MockPageFetcher::new_success("Example Domain"));
    let consumer = ConsumerLoop::new(consumer_queue, fetcher.clone(), TOPIC);
    let (consumer_tx, consumer_rx) = shutdown_channel();
    let consumer_task = tokio::spawn(async move { consumer.run(consumer_rx).await });

    tokio::time::sleep(Duration::from_millis(50)).await;
    consumer_tx.shutdown();
    consumer_task.await.unwrap().unwrap();

    assert_eq!(fetcher.fetched().len(), published.len());
    assert!(fetcher.fetched().iter().all(|url| url == "https://example.org"));
}

/// A mix of failing and succeeding fetches never stalls the consumer
#[tokio::test]
async fn consumer_survives_failing_items() {
    use scrapeflow_core::port::fetcher::mocks::MockFetchBehavior;

    let queue = Arc::new(MockWorkQueue::new());
    let fetcher = Arc::new(MockPageFetcher::new_fail("timeout"));
    for i in 0..5 {
        queue.inject(format!("https://host-{i}.example"));
    }

    let consumer = ConsumerLoop::new(queue.clone(), fetcher.clone(), TOPIC);
    let (tx, rx) = shutdown_channel();
    let task = tokio::spawn(async move { consumer.run(rx).await });

    tokio::time::sleep(Duration::from_millis(30)).await;
    // Flip to success mid-stream and keep feeding
    fetcher.set_behavior(MockFetchBehavior::Success("Recovered".to_string()));
    queue.inject("https://host-5.example");

    tokio::time::sleep(Duration::from_millis(30)).await;
    tx.shutdown();
    task.await.unwrap().unwrap();

    assert_eq!(fetcher.fetched().len(), 6, "every item was attempted");
}
