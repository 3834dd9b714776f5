use labtransfer_types::{is_reserved_key, AttachmentSlot, DbId, EntityKind, JsonId, TransientId};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

// ── DbId ─────────────────────────────────────────────────────────

#[test]
fn db_id_display_and_parse() {
    let id = DbId::new(42);
    assert_eq!(id.to_string(), "42");
    assert_eq!("42".parse::<DbId>().unwrap(), id);
    assert_eq!(" 7 ".parse::<DbId>().unwrap(), DbId::new(7));
}

#[test]
fn db_id_rejects_garbage() {
    assert!("x12".parse::<DbId>().is_err());
    assert!("-1".parse::<DbId>().is_err());
}

#[test]
fn db_id_next_increments() {
    assert_eq!(DbId::new(9).next(), DbId::new(10));
}

// ── JsonId ───────────────────────────────────────────────────────

#[test]
fn json_id_uses_kind_prefix() {
    assert_eq!(JsonId::new(EntityKind::Organization, 0).as_str(), "/ro#0");
    assert_eq!(JsonId::new(EntityKind::Person, 12).as_str(), "/pers#12");
    assert_eq!(JsonId::new(EntityKind::Publication, 3).as_str(), "/publi#3");
}

#[test]
fn json_id_kind_roundtrip_for_every_referencable_kind() {
    for kind in EntityKind::ALL {
        if kind.prefix().is_empty() {
            continue;
        }
        let id = JsonId::new(kind, 5);
        assert_eq!(id.kind().unwrap(), kind);
    }
}

#[test]
fn json_id_parse_rejects_unknown_prefix() {
    assert!("/nothing#1".parse::<JsonId>().is_err());
    assert!("/jour#1".parse::<JsonId>().is_ok());
}

#[test]
fn prefixes_are_not_prefixes_of_each_other() {
    for a in EntityKind::ALL {
        for b in EntityKind::ALL {
            if a != b && !a.prefix().is_empty() && !b.prefix().is_empty() {
                assert!(!a.prefix().starts_with(b.prefix()), "{a:?} vs {b:?}");
            }
        }
    }
}

proptest! {
    #[test]
    fn json_id_sequence_is_suffix(seq in 0u64..1_000_000) {
        let id = JsonId::new(EntityKind::Journal, seq);
        let expected = seq.to_string();
        prop_assert_eq!(id.as_str().strip_prefix("/jour#"), Some(expected.as_str()));
    }

    #[test]
    fn db_id_text_roundtrip(value in any::<u64>()) {
        let id = DbId::new(value);
        prop_assert_eq!(id.to_string().parse::<DbId>().unwrap(), id);
    }
}

// ── EntityKind ───────────────────────────────────────────────────

#[test]
fn kinds_are_in_dependency_order() {
    let order = EntityKind::ALL;
    let pos = |k: EntityKind| order.iter().position(|x| *x == k).unwrap();
    assert!(pos(EntityKind::Address) < pos(EntityKind::Organization));
    assert!(pos(EntityKind::Organization) < pos(EntityKind::Person));
    assert!(pos(EntityKind::Person) < pos(EntityKind::Membership));
    assert!(pos(EntityKind::Journal) < pos(EntityKind::Publication));
    assert!(pos(EntityKind::Conference) < pos(EntityKind::Publication));
    assert!(pos(EntityKind::Membership) < pos(EntityKind::Supervision));
    assert!(pos(EntityKind::Project) < pos(EntityKind::AssociatedStructure));
    assert!(pos(EntityKind::TeachingActivity) < pos(EntityKind::ApplicationUser));
}

#[test]
fn section_lookup() {
    assert_eq!(
        EntityKind::from_section("researchOrganizations").unwrap(),
        EntityKind::Organization
    );
    assert!(EntityKind::from_section("nope").is_err());
}

// ── Reserved keys ────────────────────────────────────────────────

#[test]
fn reserved_keys() {
    assert!(is_reserved_key("@id"));
    assert!(is_reserved_key("_source"));
    assert!(is_reserved_key("ID"));
    assert!(is_reserved_key(""));
    assert!(!is_reserved_key("name"));
    assert!(!is_reserved_key("identifier"));
}

// ── Attachments ──────────────────────────────────────────────────

#[test]
fn project_slots() {
    let slots: Vec<_> = AttachmentSlot::for_kind(EntityKind::Project).collect();
    assert_eq!(slots.len(), 5);
    assert!(slots.contains(&AttachmentSlot::ProjectImage));
    assert!(AttachmentSlot::ProjectImage.is_indexed());
    assert!(!AttachmentSlot::ProjectLogo.is_indexed());
}

#[test]
fn transient_ids_are_unique() {
    assert_ne!(TransientId::new(), TransientId::new());
}
