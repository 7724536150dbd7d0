//! Integration test: run the hello agent on the in-process runtime and check the
//! conversation from first message to process stop.

use lib::agent::SHUTTING_DOWN;
use lib::config::Config;
use lib::host::AgentHost;
use lib::lifetime::LifetimeController;
use lib::messages::{Message, Shutdown};
use lib::runtime::{PublishError, TopicId};
use lib::sink::MemorySink;
use lib::stay_alive::{EnvStayAlive, StayAliveFlag, STAY_ALIVE_ENV};
use std::sync::Arc;
use std::time::Duration;

async fn host_with(stay_alive: Arc<dyn StayAliveFlag>) -> (AgentHost, Arc<MemorySink>) {
    let sink = Arc::new(MemorySink::new());
    let host = AgentHost::start(&Config::default(), stay_alive, sink.clone())
        .await
        .expect("dispatcher registration");
    (host, sink)
}

#[tokio::test]
async fn flag_unset_shuts_down_after_goodbye() {
    let (host, sink) = host_with(Arc::new(false)).await;
    host.send("hi").await.unwrap();

    tokio::time::timeout(Duration::from_secs(5), host.run(std::future::pending()))
        .await
        .expect("agent did not stop the process");

    assert!(host.lifetime().is_stopping());
    assert_eq!(
        sink.lines(),
        vec![
            "hi".to_string(),
            "HelloAgent said Goodbye".to_string(),
            SHUTTING_DOWN.to_string(),
        ]
    );

    // Terminated is absorbing: the runtime no longer accepts messages.
    let err = host.send("again").await.unwrap_err();
    assert!(matches!(err, PublishError::RuntimeStopped(_)));
}

#[tokio::test]
async fn smallest_queue_still_runs_to_stop() {
    for capacity in [0, 1] {
        let mut config = Config::default();
        config.runtime.queue_capacity = capacity;
        let sink = Arc::new(MemorySink::new());
        let host = AgentHost::start(&config, Arc::new(false), sink.clone())
            .await
            .expect("dispatcher registration");
        host.send("hi").await.unwrap();

        tokio::time::timeout(Duration::from_secs(5), host.run(std::future::pending()))
            .await
            .expect("run stalled on a small queue");

        assert!(host.lifetime().is_stopping(), "capacity {}", capacity);
        assert_eq!(sink.lines().len(), 3);
    }
}

#[tokio::test]
async fn stay_alive_keeps_process_running() {
    let (host, sink) = host_with(Arc::new(true)).await;
    host.send("hi").await.unwrap();

    let delivered = host.runtime().run_until_idle().await;

    assert_eq!(delivered, 2);
    assert!(!host.lifetime().is_stopping());
    assert_eq!(
        sink.lines(),
        vec!["hi".to_string(), "HelloAgent said Goodbye".to_string()]
    );

    // still serving: a second conversation runs the same way
    host.send("again").await.unwrap();
    assert_eq!(host.runtime().run_until_idle().await, 2);
    assert_eq!(sink.lines().len(), 4);
}

#[tokio::test]
async fn external_stop_ends_run_without_shutdown_message() {
    let (host, sink) = host_with(Arc::new(true)).await;
    host.send("hi").await.unwrap();
    host.runtime().run_until_idle().await;

    host.run(async {}).await;

    assert!(!host.lifetime().is_stopping());
    assert!(!sink.lines().contains(&SHUTTING_DOWN.to_string()));
}

#[tokio::test]
async fn duplicate_shutdowns_stop_once_without_fault() {
    let (host, sink) = host_with(Arc::new(true)).await;
    for _ in 0..2 {
        host.runtime()
            .publish_external(Message::from(Shutdown {}), &TopicId::hello())
            .await
            .unwrap();
    }

    assert_eq!(host.runtime().run_until_idle().await, 2);
    assert!(host.lifetime().is_stopping());
    // a late stop request is still harmless
    host.lifetime().request_stop();
    let shutdowns = sink.lines().iter().filter(|l| *l == SHUTTING_DOWN).count();
    assert_eq!(shutdowns, 2);
}

/// Environment-driven scenarios share one test so no other test races on the variable.
#[tokio::test]
async fn environment_flag_uses_exact_match() {
    let cases: [(Option<&str>, bool); 7] = [
        (None, false),
        (Some(""), false),
        (Some("false"), false),
        (Some("TRUE"), false),
        (Some("True"), false),
        (Some("1"), false),
        (Some("true"), true),
    ];

    for (value, stays_alive) in cases {
        match value {
            Some(v) => std::env::set_var(STAY_ALIVE_ENV, v),
            None => std::env::remove_var(STAY_ALIVE_ENV),
        }
        let (host, sink) = host_with(Arc::new(EnvStayAlive)).await;
        host.send("hi").await.unwrap();
        host.runtime().run_until_idle().await;

        assert_eq!(
            host.lifetime().is_stopping(),
            !stays_alive,
            "STAY_ALIVE_ON_GOODBYE={:?}",
            value
        );
        assert_eq!(sink.lines()[1], "HelloAgent said Goodbye");
        assert_eq!(
            sink.lines().contains(&SHUTTING_DOWN.to_string()),
            !stays_alive
        );
    }
    std::env::remove_var(STAY_ALIVE_ENV);
}
