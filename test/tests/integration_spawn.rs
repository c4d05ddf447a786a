/// INTEGRATION TESTS: Spawn messages
///
/// A spawned replica arrives with its creation info, its forward message
/// channels and every OnSpawn channel, stamped with the message timestamp.

use replistream_shared::{
    PropertyChannel, ReplicaId, ReplicaMessageEvent, ReplicaReadError, ReplicaStreamMode,
    SerializationPhase,
};
use replistream_test::{
    assert_channel_value, assert_registered, exchange, protocol, RecordingChannel, TestPeer,
};

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn replica_id(value: u32) -> ReplicaId {
    ReplicaId::new(value).unwrap()
}

#[test]
fn spawn_creates_replica_on_receiver() {
    init_logger();
    let protocol = protocol();
    let mut server = TestPeer::new(&protocol);
    let mut client = TestPeer::new(&protocol);

    let mut player = server.channel_types.player(replica_id(42));
    if let Some(position) = player.channel_as_mut::<PropertyChannel<u32>>("Position") {
        position.set(1234);
    }
    if let Some(name) = player.channel_as_mut::<PropertyChannel<String>>("Name") {
        name.set("ada".to_string());
    }

    let event = exchange(
        &mut server,
        &mut client,
        ReplicaStreamMode::Spawn,
        7,
        Some(&player),
    );

    assert!(matches!(event, ReplicaMessageEvent::Spawned(id) if id == replica_id(42)));
    assert_registered!(client, [replica_id(42)]);
    assert_channel_value!(client, replica_id(42), "Position", PropertyChannel<u32>, 1234);
    assert_channel_value!(client, replica_id(42), "Name", PropertyChannel<String>, "ada".to_string());

    let received = client.registry.get(&replica_id(42)).unwrap();
    assert_eq!(received.create_context().name(), "Default");
    assert_eq!(received.replica_type().name(), "Player");
    assert!(!received.is_cloned());
    assert!(!received.is_emplaced());
}

#[test]
fn spawn_stamps_channels_with_phase_and_timestamp() {
    init_logger();
    let protocol = protocol();
    let mut server = TestPeer::new(&protocol);
    let mut client = TestPeer::new(&protocol);
    let player = server.channel_types.player(replica_id(1));

    exchange(
        &mut server,
        &mut client,
        ReplicaStreamMode::Spawn,
        3000,
        Some(&player),
    );

    let recorder = client
        .registry
        .get(&replica_id(1))
        .and_then(|replica| replica.channel_as::<RecordingChannel>("Recorder"))
        .unwrap();
    assert_eq!(
        recorder.received,
        vec![(SerializationPhase::Initialization, 3000)]
    );
    let position = client
        .registry
        .get(&replica_id(1))
        .and_then(|replica| replica.channel_as::<PropertyChannel<u32>>("Position"))
        .unwrap();
    assert_eq!(
        position.last_received(),
        Some((SerializationPhase::Initialization, 3000))
    );
}

#[test]
fn spawn_opens_forward_message_channels_on_both_sides() {
    init_logger();
    let protocol = protocol();
    let mut server = TestPeer::new(&protocol);
    let mut client = TestPeer::new(&protocol);
    let first = server.channel_types.player(replica_id(1));
    let second = server.channel_types.door(replica_id(2));

    exchange(&mut server, &mut client, ReplicaStreamMode::Spawn, 0, Some(&first));
    exchange(&mut server, &mut client, ReplicaStreamMode::Spawn, 0, Some(&second));

    for id in [replica_id(1), replica_id(2)] {
        let opened = server.link.forward_channels(&id).unwrap();
        assert_eq!(opened.len(), 2);
        assert_eq!(client.link.forward_channels(&id), Some(opened));
    }
    assert_ne!(
        server.link.forward_channels(&replica_id(1)),
        server.link.forward_channels(&replica_id(2))
    );
    assert_eq!(client.link.reverse_channels(&replica_id(1)), None);
}

#[test]
fn spawn_uses_second_create_context() {
    init_logger();
    let protocol = protocol();
    let mut server = TestPeer::new(&protocol);
    let mut client = TestPeer::new(&protocol);
    let door = server.channel_types.door(replica_id(9));

    exchange(&mut server, &mut client, ReplicaStreamMode::Spawn, 0, Some(&door));

    let received = client.registry.get(&replica_id(9)).unwrap();
    assert_eq!(received.create_context().name(), "Level");
    assert_eq!(received.replica_type().name(), "Door");
}

#[test]
fn truncated_spawn_leaves_no_message_channels() {
    init_logger();
    let protocol = protocol();
    let mut server = TestPeer::new(&protocol);
    let mut client = TestPeer::new(&protocol);
    let player = server.channel_types.player(replica_id(9));

    let mut bytes = server
        .try_write(ReplicaStreamMode::Spawn, 0, Some(&player))
        .unwrap();
    bytes.truncate(bytes.len() - 1);

    let result = client.read(&bytes, 0);

    assert!(matches!(result, Err(ReplicaReadError::Channel { .. })));
    assert_registered!(client, []);
    assert_eq!(client.link.forward_channels(&replica_id(9)), None);
}
