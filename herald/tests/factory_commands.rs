//! Factory-backed registrations: per-dispatch construction, lifecycle
//! wiring, and construction-failure propagation.

use herald::{
    BoxError, CommandDispatcher, DispatchError, Registrar, SharedCommand,
    testing::ScriptedCommand,
};
use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

mod common;
use common::fixed;

type Dispatcher = CommandDispatcher<&'static str, String, String>;
type Command = SharedCommand<&'static str, String, String>;

#[tokio::test]
async fn a_fresh_instance_is_constructed_per_dispatch() {
    let d = Dispatcher::new();
    let built = Arc::new(AtomicUsize::new(0));

    let counter = built.clone();
    d.register_factory("Sync", move || {
        counter.fetch_add(1, Ordering::SeqCst);
        Ok::<_, BoxError>(
            Arc::new(ScriptedCommand::new("Sync", "ran".to_string())) as Command
        )
    });

    assert_eq!(d.dispatch("Sync", "go".to_string()).await.unwrap(), "ran");
    assert_eq!(d.dispatch("Sync", "go".to_string()).await.unwrap(), "ran");
    assert_eq!(built.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn a_claiming_command_intercepts_subsequent_dispatches_of_its_tag() {
    let d = Dispatcher::new();
    let built = Arc::new(AtomicUsize::new(0));

    let counter = built.clone();
    d.register_factory("Sync", move || {
        counter.fetch_add(1, Ordering::SeqCst);
        Ok::<_, BoxError>(Arc::new(
            ScriptedCommand::new("Sync", "started".to_string())
                .claims_with(fixed("in progress")),
        ) as Command)
    });

    // First dispatch constructs the instance, which claims its own tag.
    let first = d.dispatch("Sync", "go".to_string()).await.unwrap();
    assert_eq!(first, "started");
    assert!(d.is_overridden(&"Sync"));

    // While the claim is held, no new instance is built.
    let second = d.dispatch("Sync", "go".to_string()).await.unwrap();
    assert_eq!(second, "in progress");
    assert_eq!(built.load(Ordering::SeqCst), 1);

    // A finish for the tag restores factory routing.
    let releaser: Command =
        Arc::new(ScriptedCommand::new("Sync", "done".to_string()).releases());
    d.initialize_command(releaser, "done".to_string())
        .await
        .unwrap();

    let third = d.dispatch("Sync", "go".to_string()).await.unwrap();
    assert_eq!(third, "started");
    assert_eq!(built.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn construction_failure_propagates_to_the_dispatching_caller() {
    let d = Dispatcher::new();
    d.register_factory("Broken", || {
        Err::<Command, BoxError>("no instance available".into())
    });

    let err = d.dispatch("Broken", "go".to_string()).await.unwrap_err();
    let DispatchError::Handler(source) = err else {
        panic!("construction failure must surface as a handler error, got: {err}");
    };
    assert_eq!(source.to_string(), "no instance available");
}

#[tokio::test]
async fn registrar_wires_commands_and_functions_alike() {
    let d = Dispatcher::new();

    Registrar::new()
        .command("Sync", || {
            Ok::<_, BoxError>(
                Arc::new(ScriptedCommand::new("Sync", "synced".to_string())) as Command
            )
        })
        .function("Ping", |_p: String| async move {
            Ok::<_, BoxError>("pong".to_string())
        })
        .apply(&d);

    assert!(d.command_exists(&"Sync"));
    assert!(d.command_exists(&"Ping"));
    assert_eq!(d.dispatch("Sync", "go".to_string()).await.unwrap(), "synced");
    assert_eq!(d.dispatch("Ping", "go".to_string()).await.unwrap(), "pong");
}
