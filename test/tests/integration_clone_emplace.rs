/// INTEGRATION TESTS: Clone messages
///
/// A non emplaced clone is created through the factory with OnCloneSpawn
/// channels. An emplaced clone binds to a local object and only carries
/// OnCloneEmplace channels.

use replistream_shared::{
    EmplaceId, Emplacement, PropertyChannel, ReplicaId, ReplicaMessageEvent, ReplicaReadError,
    ReplicaStreamMode,
};
use replistream_test::{
    assert_channel_value, assert_registered, exchange, protocol, try_exchange, ExchangeError,
    RecordingChannel, TestPeer,
};

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn replica_id(value: u32) -> ReplicaId {
    ReplicaId::new(value).unwrap()
}

fn level_door(id: u32) -> Emplacement {
    Emplacement::new("Level1", EmplaceId::new(id).unwrap())
}

#[test]
fn clone_without_emplacement_is_created_fresh() {
    init_logger();
    let protocol = protocol();
    let mut server = TestPeer::new(&protocol);
    let mut late_joiner = TestPeer::new(&protocol);

    let mut player = server.channel_types.player(replica_id(5));
    if let Some(health) = player.channel_as_mut::<PropertyChannel<u8>>("Health") {
        health.set(37);
    }

    let event = exchange(
        &mut server,
        &mut late_joiner,
        ReplicaStreamMode::Clone,
        11,
        Some(&player),
    );

    assert!(matches!(event, ReplicaMessageEvent::Cloned(id) if id == replica_id(5)));
    assert_channel_value!(late_joiner, replica_id(5), "Health", PropertyChannel<u8>, 37);

    let received = late_joiner.registry.get(&replica_id(5)).unwrap();
    assert!(received.is_cloned());
    assert!(!received.is_emplaced());
}

#[test]
fn emplaced_clone_binds_to_local_object() {
    init_logger();
    let protocol = protocol();
    let mut server = TestPeer::new(&protocol);
    let mut client = TestPeer::new(&protocol);

    let mut door = server
        .channel_types
        .door(replica_id(77))
        .with_emplacement(level_door(3));
    if let Some(open) = door.channel_as_mut::<PropertyChannel<bool>>("DoorState") {
        open.set(true);
    }
    if let Some(position) = door.channel_as_mut::<PropertyChannel<u32>>("Position") {
        position.set(500);
    }

    // the client loaded the same level and already has this door, but under
    // an id only it knows about
    let local_door = client.channel_types.door(replica_id(1000));
    client.factory.place_local_object(level_door(3), local_door);

    let event = exchange(
        &mut server,
        &mut client,
        ReplicaStreamMode::Clone,
        0,
        Some(&door),
    );

    assert!(matches!(event, ReplicaMessageEvent::Emplaced(id) if id == replica_id(77)));
    assert_eq!(client.factory.local_object_count(), 0);
    assert_registered!(client, [replica_id(77)]);
    assert_channel_value!(client, replica_id(77), "DoorState", PropertyChannel<bool>, true);
    assert_channel_value!(client, replica_id(77), "Position", PropertyChannel<u32>, 500);

    let received = client.registry.get(&replica_id(77)).unwrap();
    assert!(received.is_cloned());
    assert_eq!(received.emplacement(), Some(&level_door(3)));
}

#[test]
fn emplaced_clone_skips_spawn_only_channels() {
    init_logger();
    let protocol = protocol();
    let mut server = TestPeer::new(&protocol);
    let mut client = TestPeer::new(&protocol);

    let mut player = server
        .channel_types
        .player(replica_id(8))
        .with_emplacement(level_door(9));
    if let Some(name) = player.channel_as_mut::<PropertyChannel<String>>("Name") {
        name.set("never sent".to_string());
    }
    client
        .factory
        .place_local_object(level_door(9), client.channel_types.player(replica_id(8)));

    exchange(&mut server, &mut client, ReplicaStreamMode::Clone, 2, Some(&player));

    // Name and Health are OnSpawn/OnCloneSpawn only
    assert_channel_value!(client, replica_id(8), "Name", PropertyChannel<String>, String::new());
    assert_channel_value!(client, replica_id(8), "Health", PropertyChannel<u8>, 100);
    let recorder = client
        .registry
        .get(&replica_id(8))
        .and_then(|replica| replica.channel_as::<RecordingChannel>("Recorder"))
        .unwrap();
    assert_eq!(recorder.received.len(), 1);
}

#[test]
fn emplaced_clone_without_local_object_is_rejected() {
    init_logger();
    let protocol = protocol();
    let mut server = TestPeer::new(&protocol);
    let mut client = TestPeer::new(&protocol);
    let door = server
        .channel_types
        .door(replica_id(4))
        .with_emplacement(level_door(4));

    let result = try_exchange(&mut server, &mut client, ReplicaStreamMode::Clone, 0, Some(&door));

    assert!(matches!(
        result,
        Err(ExchangeError::Read(ReplicaReadError::EmplaceTargetMissing { .. }))
    ));
    assert_registered!(client, []);
}

#[test]
fn clone_of_live_replica_is_a_duplicate() {
    init_logger();
    let protocol = protocol();
    let mut server = TestPeer::new(&protocol);
    let mut client = TestPeer::new(&protocol);
    let player = server.channel_types.player(replica_id(6));

    exchange(&mut server, &mut client, ReplicaStreamMode::Spawn, 0, Some(&player));
    let result = try_exchange(&mut server, &mut client, ReplicaStreamMode::Clone, 0, Some(&player));

    assert!(matches!(
        result,
        Err(ExchangeError::Read(ReplicaReadError::DuplicateReplica { .. }))
    ));
    assert_registered!(client, [replica_id(6)]);
}

#[test]
fn truncated_emplaced_clone_returns_local_object() {
    init_logger();
    let protocol = protocol();
    let mut server = TestPeer::new(&protocol);
    let mut client = TestPeer::new(&protocol);
    let door = server
        .channel_types
        .door(replica_id(77))
        .with_emplacement(level_door(3));
    client
        .factory
        .place_local_object(level_door(3), client.channel_types.door(replica_id(1000)));

    let mut bytes = server
        .try_write(ReplicaStreamMode::Clone, 0, Some(&door))
        .unwrap();
    bytes.truncate(bytes.len() - 1);

    let result = client.read(&bytes, 0);

    assert!(matches!(result, Err(ReplicaReadError::Channel { .. })));
    assert_registered!(client, []);
    assert_eq!(client.link.forward_channels(&replica_id(77)), None);

    // the local object is back, untouched by the rejected identity
    assert_eq!(client.factory.local_object_count(), 1);
    let local_door = client.factory.local_object(&level_door(3)).unwrap();
    assert_eq!(local_door.id(), replica_id(1000));
    assert!(!local_door.is_cloned());
    assert!(!local_door.is_emplaced());

    // and can still be bound by the intact message
    let event = exchange(&mut server, &mut client, ReplicaStreamMode::Clone, 0, Some(&door));
    assert!(matches!(event, ReplicaMessageEvent::Emplaced(id) if id == replica_id(77)));
    assert_eq!(client.factory.local_object_count(), 0);
    assert_registered!(client, [replica_id(77)]);
}
