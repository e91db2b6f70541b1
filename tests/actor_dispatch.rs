use std::time::Duration;

use koord::actor::{dispatch, Actor, DirectoryRole};
use koord::args::Mode;
use koord::capabilities::Capabilities;
use koord::config::InitFileSettings;
use koord::launch::{resolve, Launch, LaunchPlan};
use koord::shutdown::ShutdownCoordinator;

fn plan(tokens: &[&str]) -> LaunchPlan {
    let args: Vec<String> = tokens.iter().map(|s| s.to_string()).collect();
    match resolve("koord", &args, &Capabilities::full()) {
        Ok(Launch::Run(plan)) => plan,
        other => panic!("expected a run plan, got {other:?}"),
    }
}

#[tokio::test]
async fn headless_server_runs_until_shutdown() {
    let plan = plan(&["-s", "-n", "--serverbindip", "127.0.0.1", "-p", "0", "-e", "localhost"]);
    let actor = dispatch(plan.config, &InitFileSettings::default(), None).unwrap();
    assert_eq!(actor.mode(), Mode::Server);
    assert!(actor.local_addr().ip().is_loopback());

    let Actor::Server(server) = &actor else {
        panic!("expected a server actor");
    };
    assert_eq!(server.profile().directory, DirectoryRole::Host);

    let coordinator = ShutdownCoordinator::new();
    let task = tokio::spawn(actor.run(coordinator.handle()));
    tokio::time::sleep(Duration::from_millis(20)).await;
    coordinator.signal();
    tokio::time::timeout(Duration::from_secs(5), task)
        .await
        .unwrap()
        .unwrap()
        .unwrap();
}

#[tokio::test]
async fn port_in_use_is_a_runtime_error() {
    let taken = std::net::UdpSocket::bind("127.0.0.1:0").unwrap();
    let port = taken.local_addr().unwrap().port().to_string();
    let plan = plan(&["-s", "-n", "--serverbindip", "127.0.0.1", "-p", port.as_str()]);

    let err = match dispatch(plan.config, &InitFileSettings::default(), None) {
        Ok(_) => panic!("expected bind failure"),
        Err(e) => e,
    };
    assert!(format!("{err:#}").contains("cannot bind the socket"));
}
