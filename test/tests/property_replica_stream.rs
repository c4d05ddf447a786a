/// PROPERTY-BASED TESTS: Replica stream invariants
///
/// Uses proptest to verify stream properties hold across random inputs.
///
/// Key invariants:
/// 1. A channel is serialized exactly when its flags match the mode
/// 2. Creation and identification info read back as written
/// 3. Ids unknown to the Replicator are always rejected
/// 4. Looking up a cacher never changes it

use std::sync::Arc;

use proptest::prelude::*;
use replistream_serde::{BitReader, BitWriter, Serde};
use replistream_shared::{
    CacherId, CreateContext, EmplaceId, Emplacement, MessageChannelLink, Protocol, Replica,
    ReplicaChannelType, ReplicaId, ReplicaReadError, ReplicaStreamMode, ReplicaStreamReader,
    ReplicaStreamWriter, ReplicaType, ReplicaTypeCacher, Replicator, SerializationFlag,
    SerializationFlags,
};
use replistream_test::RecordingChannel;

// Strategy for any combination of the five flags
fn flags_strategy() -> impl Strategy<Value = SerializationFlags> {
    (0u8..32u8).prop_map(|mask| {
        SerializationFlag::ALL
            .iter()
            .enumerate()
            .filter(|(index, _)| mask & (1 << index) != 0)
            .map(|(_, flag)| *flag)
            .collect::<SerializationFlags>()
    })
}

// Strategy for the modes that run the per channel pass, with an emplacement
// state that mode accepts
fn channel_pass_strategy() -> impl Strategy<Value = (ReplicaStreamMode, bool)> {
    prop_oneof![
        Just((ReplicaStreamMode::Spawn, false)),
        any::<bool>().prop_map(|emplaced| (ReplicaStreamMode::Clone, emplaced)),
        any::<bool>().prop_map(|emplaced| (ReplicaStreamMode::Forget, emplaced)),
        any::<bool>().prop_map(|emplaced| (ReplicaStreamMode::Destroy, emplaced)),
    ]
}

fn mode_strategy() -> impl Strategy<Value = ReplicaStreamMode> {
    prop::sample::select(ReplicaStreamMode::ALL.to_vec())
}

fn expected_flag(mode: ReplicaStreamMode, is_emplaced: bool) -> SerializationFlag {
    match (mode, is_emplaced) {
        (ReplicaStreamMode::Spawn, _) => SerializationFlag::OnSpawn,
        (ReplicaStreamMode::Clone, false) => SerializationFlag::OnCloneSpawn,
        (ReplicaStreamMode::Clone, true) => SerializationFlag::OnCloneEmplace,
        (ReplicaStreamMode::Forget, _) => SerializationFlag::OnForget,
        (ReplicaStreamMode::Destroy, _) => SerializationFlag::OnDestroy,
        (ReplicaStreamMode::ReverseReplicaChannels, _) => unreachable!(),
    }
}

fn replica_with_channels(
    channel_types: &[Arc<ReplicaChannelType>],
    is_emplaced: bool,
    seed: u16,
) -> Replica {
    let mut replica = Replica::new(ReplicaId::new(1).unwrap(), "Default", "Player");
    if is_emplaced {
        replica = replica.with_emplacement(Emplacement::new("Level1", EmplaceId::new(1).unwrap()));
    }
    for (index, channel_type) in channel_types.iter().enumerate() {
        let value = if seed == 0 { 0 } else { seed.wrapping_add(index as u16) };
        replica.add_channel(Box::new(RecordingChannel::new(channel_type.clone(), value)));
    }
    replica
}

fn replicator_with(names: &[String], emplace_contexts: &[&'static str]) -> Replicator {
    let mut protocol = Protocol::builder();
    protocol.add_create_context("Default");
    for name in names {
        protocol.add_replica_type(name.clone());
    }
    for context in emplace_contexts {
        protocol.add_emplace_context(*context);
    }
    Replicator::from_protocol(&protocol.build())
}

proptest! {
    /// Test that exactly the channels whose flags match the mode are written and read
    #[test]
    fn prop_channel_filter_matches_flag_table(
        all_flags in prop::collection::vec(flags_strategy(), 1..8),
        (mode, is_emplaced) in channel_pass_strategy(),
        seed in 1u16..1000u16,
        timestamp in any::<u16>(),
    ) {
        let channel_types: Vec<_> = all_flags
            .iter()
            .enumerate()
            .map(|(index, flags)| Arc::new(ReplicaChannelType::new(format!("Channel{}", index), *flags)))
            .collect();
        let replicator = replicator_with(&[], &["Level1"]);
        let mut sender_link = MessageChannelLink::new(0, 0);
        let mut receiver_link = MessageChannelLink::new(0, 0);

        let sent = replica_with_channels(&channel_types, is_emplaced, seed);
        let mut writer = BitWriter::new();
        ReplicaStreamWriter::new(&replicator, &mut sender_link, &mut writer, mode, timestamp)
            .try_write_channel_data(&sent)
            .unwrap();
        let bits_written = writer.bits_written();
        let buffer = writer.to_bytes();

        let mut received = replica_with_channels(&channel_types, is_emplaced, 0);
        let mut reader = BitReader::new(&buffer);
        ReplicaStreamReader::new(&replicator, &mut receiver_link, &mut reader, mode, timestamp)
            .read_channel_data(&mut received)
            .unwrap();

        let flag = expected_flag(mode, is_emplaced);
        let mut expected_bits = if mode == ReplicaStreamMode::Spawn || mode == ReplicaStreamMode::Clone {
            // empty forward channel record
            4
        } else {
            0
        };
        for (index, flags) in all_flags.iter().enumerate() {
            let name = format!("Channel{}", index);
            let recorder = received.channel_as::<RecordingChannel>(&name).unwrap();
            if flags.contains(flag) {
                expected_bits += 16;
                prop_assert_eq!(recorder.value, seed.wrapping_add(index as u16));
                prop_assert_eq!(recorder.received.len(), 1);
                prop_assert_eq!(recorder.received[0].1, timestamp);
            } else {
                prop_assert_eq!(recorder.value, 0);
                prop_assert!(recorder.received.is_empty());
            }
        }
        prop_assert_eq!(bits_written, expected_bits);
        prop_assert_eq!(reader.bits_read(), expected_bits as usize);
    }

    /// Test that creation info reads back as written for any registered type
    #[test]
    fn prop_creation_info_round_trip(
        count in 1usize..40,
        pick in any::<prop::sample::Index>(),
    ) {
        let names: Vec<String> = (0..count).map(|index| format!("Type{}", index)).collect();
        let replicator = replicator_with(&names, &[]);
        let mut link = MessageChannelLink::new(0, 0);
        let replica_type = ReplicaType::new(names[pick.index(count)].clone());

        let mut writer = BitWriter::new();
        ReplicaStreamWriter::new(&replicator, &mut link, &mut writer, ReplicaStreamMode::Spawn, 0)
            .try_write_creation_info(&CreateContext::new("Default"), &replica_type)
            .unwrap();
        let buffer = writer.to_bytes();

        let mut reader = BitReader::new(&buffer);
        let (create_context, read_type) =
            ReplicaStreamReader::new(&replicator, &mut link, &mut reader, ReplicaStreamMode::Spawn, 0)
                .read_creation_info()
                .unwrap();

        prop_assert_eq!(create_context, CreateContext::new("Default"));
        prop_assert_eq!(read_type, replica_type);
    }

    /// Test that ids with no mapping are rejected instead of being guessed
    #[test]
    fn prop_unknown_replica_type_id_rejected(
        count in 0usize..20,
        raw_id in any::<u16>(),
    ) {
        prop_assume!(raw_id == 0 || usize::from(raw_id) > count);

        let names: Vec<String> = (0..count).map(|index| format!("Type{}", index)).collect();
        let replicator = replicator_with(&names, &[]);
        let mut link = MessageChannelLink::new(0, 0);

        let mut writer = BitWriter::new();
        CacherId::new(1).ser(&mut writer);
        CacherId::new(raw_id).ser(&mut writer);
        let buffer = writer.to_bytes();

        let mut reader = BitReader::new(&buffer);
        let result =
            ReplicaStreamReader::new(&replicator, &mut link, &mut reader, ReplicaStreamMode::Clone, 0)
                .read_creation_info();

        prop_assert_eq!(result, Err(ReplicaReadError::UnknownReplicaTypeId { id: raw_id }));
    }

    /// Test that identification reads back as written, emplacement only in Clone
    #[test]
    fn prop_identification_round_trip(
        raw_replica_id in 1u32..=u32::MAX,
        raw_emplace_id in prop::option::of(1u32..=u32::MAX),
        mode in mode_strategy(),
    ) {
        // Spawn can't carry an emplaced replica
        prop_assume!(!(mode == ReplicaStreamMode::Spawn && raw_emplace_id.is_some()));

        let replicator = replicator_with(&[], &["Level1"]);
        let mut link = MessageChannelLink::new(0, 0);
        let mut replica = Replica::new(ReplicaId::new(raw_replica_id).unwrap(), "Default", "Player");
        let emplacement = raw_emplace_id
            .map(|id| Emplacement::new("Level1", EmplaceId::new(id).unwrap()));
        if let Some(emplacement) = &emplacement {
            replica = replica.with_emplacement(emplacement.clone());
        }

        let mut writer = BitWriter::new();
        ReplicaStreamWriter::new(&replicator, &mut link, &mut writer, mode, 0)
            .try_write_identification_info(Some(&replica))
            .unwrap();
        let buffer = writer.to_bytes();

        let mut reader = BitReader::new(&buffer);
        let identity = ReplicaStreamReader::new(&replicator, &mut link, &mut reader, mode, 0)
            .read_identification_info()
            .unwrap()
            .unwrap();

        prop_assert_eq!(identity.replica_id, replica.id());
        prop_assert_eq!(identity.is_cloned, mode == ReplicaStreamMode::Clone);
        if mode == ReplicaStreamMode::Clone {
            prop_assert_eq!(identity.emplacement, emplacement);
        } else {
            prop_assert_eq!(identity.emplacement, None);
        }
    }

    /// Test that cacher lookups are pure
    #[test]
    fn prop_cacher_reads_are_idempotent(
        names in prop::collection::hash_set("[a-z]{1,8}", 1..20),
        lookup in "[a-z]{1,8}",
        raw_id in any::<u16>(),
    ) {
        let mut cacher = ReplicaTypeCacher::new();
        for name in &names {
            cacher.map_item(ReplicaType::new(name.clone()));
        }
        let len = cacher.len();
        let lookup = ReplicaType::new(lookup);
        let id = CacherId::new(raw_id);

        let first = (cacher.mapped_item_id(&lookup), cacher.mapped_id_item(id).cloned());
        let second = (cacher.mapped_item_id(&lookup), cacher.mapped_id_item(id).cloned());

        prop_assert_eq!(&first, &second);
        prop_assert_eq!(cacher.is_item_mapped(&lookup), first.0.is_some());
        prop_assert_eq!(cacher.is_id_mapped(id), first.1.is_some());
        prop_assert_eq!(cacher.len(), len);
        if let Some(found) = first.0 {
            prop_assert_eq!(cacher.mapped_id_item(found), Some(&lookup));
        }
    }
}
