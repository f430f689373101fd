// # 🧪 Tag index: add, lookup, append, modify, remove, iteration

#[cfg(test)]
mod tests {

use std::sync::Arc;
use std::thread;

use pkghdr_core::{index::{IndexError, TagIndex, TagType, TagValue}, tags};

// ## 1️⃣ Add and lookup

    #[test]
    fn add_then_get_returns_value() {
        let mut h = TagIndex::new();
        h.add(tags::NAME, &"bash".into()).unwrap();
        h.add(tags::SIZE, &TagValue::Int32(vec![4096])).unwrap();

        assert_eq!(h.get(tags::NAME), Some(TagValue::String("bash".into())));
        assert_eq!(h.get(tags::SIZE), Some(TagValue::Int32(vec![4096])));
        assert_eq!(h.get(tags::SIZE).as_ref().and_then(TagValue::as_u32s), Some(&[4096u32][..]));
        assert!(h.is_entry(tags::NAME));
        assert!(!h.is_entry(tags::VERSION));
        assert_eq!(h.get(tags::VERSION), None);
    }

    #[test]
    fn add_rejects_empty_and_null_values() {
        let mut h = TagIndex::new();
        assert_eq!(
            h.add(tags::FILESIZES, &TagValue::Int32(vec![])),
            Err(IndexError::InvalidCount { tag: tags::FILESIZES })
        );
        assert!(matches!(
            h.add(tags::NAME, &TagValue::Null),
            Err(IndexError::InvalidArgument { .. })
        ));
        assert!(h.is_empty());
    }

    #[test]
    fn add_rejects_reserved_low_tags() {
        let mut h = TagIndex::new();
        for tag in [0, 50, tags::HEADER_IMAGE, tags::HEADER_REGIONS, -1] {
            assert!(matches!(
                h.add(tag, &"lost".into()),
                Err(IndexError::InvalidArgument { tag: t, .. }) if t == tag
            ));
        }
        assert!(h.is_empty());
        h.add(tags::HEADER_I18NTABLE, &TagValue::string_array(["C"])).unwrap();
        assert_eq!(h.len(), 1);
    }

    #[test]
    fn out_of_order_adds_are_found_and_sorted_on_demand() {
        let mut h = TagIndex::new();
        h.add(tags::VERSION, &"1.0".into()).unwrap();
        h.add(tags::NAME, &"pkg".into()).unwrap();
        assert!(!h.is_sorted());
        assert_eq!(h.get(tags::NAME), Some("pkg".into()));

        h.sort();
        assert!(h.is_sorted());
        let order: Vec<i32> = h.items().map(|i| i.tag).collect();
        assert_eq!(order, vec![tags::NAME, tags::VERSION]);
    }

// ## 2️⃣ Append and modify

    #[test]
    fn append_concatenates_arrays() {
        let mut h = TagIndex::new();
        h.add(tags::FILESIZES, &TagValue::Int32(vec![1, 2])).unwrap();
        h.append(tags::FILESIZES, &TagValue::Int32(vec![3])).unwrap();
        assert_eq!(h.get(tags::FILESIZES), Some(TagValue::Int32(vec![1, 2, 3])));

        h.add(tags::DIRNAMES, &TagValue::string_array(["/usr/"])).unwrap();
        h.append(tags::DIRNAMES, &TagValue::string_array(["/etc/", "/var/"])).unwrap();
        assert_eq!(
            h.get(tags::DIRNAMES),
            Some(TagValue::string_array(["/usr/", "/etc/", "/var/"]))
        );
    }

    #[test]
    fn append_rejects_strings_and_missing_tags() {
        let mut h = TagIndex::new();
        h.add(tags::NAME, &"a".into()).unwrap();
        assert_eq!(
            h.append(tags::NAME, &"b".into()),
            Err(IndexError::NotAppendable { tag: tags::NAME, ty: TagType::String })
        );
        assert_eq!(
            h.append(tags::SIZE, &TagValue::Int32(vec![1])),
            Err(IndexError::NotFound { tag: tags::SIZE })
        );
    }

    #[test]
    fn add_or_append_picks_the_right_operation() {
        let mut h = TagIndex::new();
        h.add_or_append(tags::REQUIRENAME, &TagValue::string_array(["libc"])).unwrap();
        h.add_or_append(tags::REQUIRENAME, &TagValue::string_array(["libm"])).unwrap();
        assert_eq!(h.get(tags::REQUIRENAME), Some(TagValue::string_array(["libc", "libm"])));
        assert_eq!(h.len(), 1);
    }

    #[test]
    fn modify_replaces_value_of_same_type() {
        let mut h = TagIndex::new();
        h.add(tags::RELEASE, &"1".into()).unwrap();
        h.modify(tags::RELEASE, &"2".into()).unwrap();
        assert_eq!(h.get(tags::RELEASE), Some("2".into()));

        assert_eq!(
            h.modify(tags::RELEASE, &TagValue::Int32(vec![2])),
            Err(IndexError::NotFound { tag: tags::RELEASE })
        );
    }

// ## 3️⃣ Remove and duplicates

    #[test]
    fn remove_deletes_every_entry_with_tag() {
        let mut h = TagIndex::new();
        h.add(tags::PROVIDENAME, &TagValue::string_array(["a"])).unwrap();
        h.add(tags::PROVIDENAME, &TagValue::Int32(vec![1])).unwrap();
        h.add(tags::NAME, &"n".into()).unwrap();

        assert_eq!(h.remove(tags::PROVIDENAME), 2);
        assert!(!h.is_entry(tags::PROVIDENAME));
        assert_eq!(h.remove(tags::PROVIDENAME), 0);
        assert!(h.is_entry(tags::NAME));
    }

    #[test]
    fn re_add_after_remove_holds_only_new_value() {
        let mut h = TagIndex::new();
        h.add(tags::RELEASE, &"1".into()).unwrap();
        h.remove(tags::RELEASE);
        assert_eq!(h.get(tags::RELEASE), None);

        h.add(tags::RELEASE, &"2".into()).unwrap();
        assert_eq!(h.get(tags::RELEASE), Some("2".into()));
        assert_eq!(h.items().filter(|i| i.tag == tags::RELEASE).count(), 1);
    }

    #[test]
    fn duplicate_tags_resolve_by_type() {
        let mut h = TagIndex::new();
        h.add(tags::EPOCH, &TagValue::Int32(vec![1])).unwrap();
        h.add(tags::EPOCH, &TagValue::Int16(vec![2])).unwrap();

        let e = h.find(tags::EPOCH, Some(TagType::Int16)).unwrap();
        assert_eq!(e.count(), 1);
        assert_eq!(e.data(), &[0, 2]);
        assert_eq!(h.get(tags::EPOCH), Some(TagValue::Int32(vec![1])));
    }

// ## 4️⃣ Iteration and sharing

    #[test]
    fn items_yield_raw_typed_values_in_tag_order() {
        let mut h = TagIndex::new();
        h.add(tags::SUMMARY, &"s".into()).unwrap();
        h.add(tags::NAME, &"n".into()).unwrap();
        h.add(tags::SIZE, &TagValue::Int32(vec![7])).unwrap();

        let items: Vec<_> = h.items().collect();
        assert_eq!(items.len(), 3);
        assert_eq!(items[0].tag, tags::NAME);
        assert_eq!(items[1].tag, tags::SUMMARY);
        assert_eq!(items[2].ty, TagType::Int32);
        assert_eq!(items[2].value, TagValue::Int32(vec![7]));
    }

    #[test]
    fn shared_index_is_readable_from_threads() {
        let mut h = TagIndex::new();
        h.add(tags::NAME, &"shared".into()).unwrap();
        let shared: Arc<TagIndex> = h.into_shared();

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let h = Arc::clone(&shared);
                thread::spawn(move || h.get(tags::NAME))
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), Some("shared".into()));
        }
        assert_eq!(Arc::strong_count(&shared), 1);
    }
}
