//! The binder: walk a target, then convert and write every tagged field.
//!
//! There is no rollback. When a field fails, fields already written keep
//! their new values; bind into a scratch value and swap it in if you need
//! all-or-nothing behavior.

use tracing::debug;

use crate::error::BindError;
use crate::field::Annotated;
use crate::types::Mapping;
use crate::walk::{self, BindingTable, Required, Slot};

/// Bind `annotations` into `target`.
///
/// - `target` of `None` is an [`BindError::InvalidTarget`].
/// - `annotations` of `None` is a no-op success; the target is not touched.
///
/// Otherwise every tagged field is resolved and converted. The first error
/// aborts the call: a missing required key, a malformed tag, an unparsable
/// value or default, or an unsupported field type.
pub fn bind<T: Annotated>(
    annotations: Option<&Mapping>,
    target: Option<&mut T>,
) -> Result<(), BindError> {
    let Some(target) = target else {
        return Err(BindError::InvalidTarget {
            reason: "no structure value (None)".into(),
        });
    };
    let Some(annotations) = annotations else {
        return Ok(());
    };
    let root = root_name::<T>();
    let table = walk::build_table(annotations, root, target.fields(), Required::Enforce)?;
    bind_table(table)
}

/// Unqualified type name, used as the first segment of field paths.
pub(crate) fn root_name<T: ?Sized>() -> &'static str {
    let full = std::any::type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}

fn bind_table(table: BindingTable<'_>) -> Result<(), BindError> {
    for (path, entry) in table {
        let binding = entry.binding;
        let value = match entry.slot {
            Slot::Unsupported(type_name) => {
                return Err(BindError::UnsupportedKind {
                    path,
                    key: binding.resolved_key,
                    type_name,
                });
            }
            Slot::Value(value) => value,
        };

        if binding.tag.protected && !value.is_zero() {
            debug!(field = %path, key = %binding.resolved_key, "keeping protected value");
            continue;
        }

        value.assign(&binding)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::Field;
    use crate::fixtures::test::{mapping, DnsConfig, Infoblox, Outer, Protected, RequiredConfig};

    fn dns(pairs: &[(&str, &str)]) -> Result<DnsConfig, BindError> {
        let mut config = DnsConfig::default();
        bind(Some(&mapping(pairs)), Some(&mut config))?;
        Ok(config)
    }

    #[test]
    fn defaults_from_empty_mapping() {
        let config = dns(&[]).unwrap();
        assert_eq!(config.ttl, 30);
        assert_eq!(config.strategy, "roundRobin");
        assert_eq!(config.geo_tags, vec!["us", "eu"]);
        assert_eq!(config.weights, vec![1, 2, 3]);
        assert!(config.ready);
        assert_eq!(config.ratio, 0.5);
        assert_eq!(config.infoblox.port, 443);
        assert_eq!(config.infoblox.host, "");
    }

    #[test]
    fn values_override_defaults() {
        let config = dns(&[
            ("dns-ttl-seconds", "60"),
            ("strategy", "failover"),
            ("geo-tags", "fr, au"),
            ("weights", "5,6.9"),
            ("ready", "false"),
            ("ratio", "0.25"),
            ("infoblox_host", "ib.example.com"),
            ("infoblox_port", "8443"),
        ])
        .unwrap();
        assert_eq!(config.ttl, 60);
        assert_eq!(config.strategy, "failover");
        assert_eq!(config.geo_tags, vec!["fr", "au"]);
        assert_eq!(config.weights, vec![5, 6]);
        assert!(!config.ready);
        assert_eq!(config.ratio, 0.25);
        assert_eq!(config.infoblox.host, "ib.example.com");
        assert_eq!(config.infoblox.port, 8443);
    }

    #[test]
    fn explicit_empty_sequence_overrides_default() {
        let config = dns(&[("geo-tags", ""), ("weights", "")]).unwrap();
        assert!(config.geo_tags.is_empty());
        assert!(config.weights.is_empty());
    }

    #[test]
    fn untagged_field_left_alone() {
        let mut config = DnsConfig {
            scratch: "keep".into(),
            ..DnsConfig::default()
        };
        bind(Some(&mapping(&[("scratch", "x")])), Some(&mut config)).unwrap();
        assert_eq!(config.scratch, "keep");
    }

    #[test]
    fn conversion_failure_names_key() {
        let err = dns(&[("dns-ttl-seconds", "notanumber")]).unwrap_err();
        assert!(matches!(err, BindError::Conversion { .. }));
        let msg = err.to_string();
        assert!(msg.contains("dns-ttl-seconds"));
        assert!(msg.contains("notanumber"));
    }

    #[test]
    fn some_invalid_field_reports_error() {
        let result = dns(&[("ready", "maybe"), ("ratio", "half"), ("weights", "a,b")]);
        assert!(matches!(result, Err(BindError::Conversion { .. })));
    }

    #[test]
    fn out_of_range_port_fails() {
        let err = dns(&[("infoblox_port", "70000")]).unwrap_err();
        match err {
            BindError::Conversion { key, value, .. } => {
                assert_eq!(key, "infoblox_port");
                assert_eq!(value, "70000");
            }
            other => panic!("Expected Conversion, got: {other:?}"),
        }
    }

    #[test]
    fn binding_is_idempotent() {
        let pairs = [("dns-ttl-seconds", "15"), ("geo-tags", "za,ke")];
        let first = dns(&pairs).unwrap();
        let second = dns(&pairs).unwrap();
        assert_eq!(first, second);

        let mut again = first.clone();
        bind(Some(&mapping(&pairs)), Some(&mut again)).unwrap();
        assert_eq!(again, first);
    }

    #[test]
    fn protected_keeps_existing_value() {
        let mut p = Protected {
            count: 7,
            ..Protected::default()
        };
        bind(Some(&mapping(&[("count", "9")])), Some(&mut p)).unwrap();
        assert_eq!(p.count, 7);
    }

    #[test]
    fn protected_zero_value_is_bound() {
        let mut p = Protected::default();
        bind(Some(&mapping(&[("count", "9")])), Some(&mut p)).unwrap();
        assert_eq!(p.count, 9);
    }

    #[test]
    fn protected_applies_per_kind() {
        let mut p = Protected {
            name: "set".into(),
            zones: vec!["a".into()],
            enabled: true,
            ..Protected::default()
        };
        let annotations = mapping(&[
            ("name", "other"),
            ("zones", "b,c"),
            ("enabled", "false"),
            ("count", "3"),
        ]);
        bind(Some(&annotations), Some(&mut p)).unwrap();
        assert_eq!(p.name, "set");
        assert_eq!(p.zones, vec!["a"]);
        assert!(p.enabled);
        assert_eq!(p.count, 3);
    }

    #[test]
    fn protected_skips_invalid_value() {
        let mut p = Protected {
            count: 7,
            ..Protected::default()
        };
        bind(Some(&mapping(&[("count", "garbage")])), Some(&mut p)).unwrap();
        assert_eq!(p.count, 7);
    }

    #[test]
    fn required_key_missing() {
        let mut config = RequiredConfig::default();
        let err = bind(Some(&mapping(&[])), Some(&mut config)).unwrap_err();
        assert!(matches!(err, BindError::RequiredKeyMissing { ref key } if key == "cluster_name"));
    }

    #[test]
    fn required_key_present_ignores_default() {
        let mut config = RequiredConfig::default();
        bind(Some(&mapping(&[("cluster_name", "anything")])), Some(&mut config)).unwrap();
        assert_eq!(config.cluster.name, "anything");
    }

    #[test]
    fn nested_prefix_binding() {
        let mut outer = Outer::default();
        let annotations = mapping(&[
            ("outer_inner", "in"),
            ("outer_deep_leaf", "deep"),
            ("level", "3"),
        ]);
        bind(Some(&annotations), Some(&mut outer)).unwrap();
        assert_eq!(outer.nested.value, "in");
        assert_eq!(outer.nested.deeper.leaf, "deep");
        assert_eq!(outer.flat.level, 3);
    }

    #[test]
    fn none_mapping_is_noop() {
        let mut config = DnsConfig::default();
        bind(None, Some(&mut config)).unwrap();
        assert_eq!(config, DnsConfig::default());
    }

    #[test]
    fn none_target_is_invalid() {
        let err = bind::<DnsConfig>(Some(&mapping(&[])), None).unwrap_err();
        assert!(matches!(err, BindError::InvalidTarget { .. }));
    }

    #[test]
    fn bind_from_shorthand() {
        let mut infoblox = Infoblox::default();
        infoblox
            .bind_from(&mapping(&[("host", "h"), ("port", "1")]))
            .unwrap();
        assert_eq!(infoblox.host, "h");
        assert_eq!(infoblox.port, 1);
    }

    #[test]
    fn unsupported_kind_fails() {
        #[derive(Default)]
        struct WithMap {
            name: String,
        }
        impl Annotated for WithMap {
            fn fields(&mut self) -> Vec<Field<'_>> {
                vec![
                    Field::leaf("name", "name", &mut self.name),
                    Field::unsupported::<std::collections::HashMap<String, String>>(
                        "labels", "labels",
                    ),
                ]
            }
        }
        let mut target = WithMap::default();
        let err = bind(Some(&mapping(&[])), Some(&mut target)).unwrap_err();
        match err {
            BindError::UnsupportedKind { path, key, type_name } => {
                assert_eq!(path, "WithMap.labels");
                assert_eq!(key, "labels");
                assert!(type_name.contains("HashMap"));
            }
            other => panic!("Expected UnsupportedKind, got: {other:?}"),
        }
    }

    #[test]
    fn fields_written_before_error_keep_values() {
        #[derive(Default)]
        struct Pair {
            a: i32,
            b: i32,
        }
        impl Annotated for Pair {
            fn fields(&mut self) -> Vec<Field<'_>> {
                vec![
                    Field::leaf("a", "a", &mut self.a),
                    Field::leaf("b", "b", &mut self.b),
                ]
            }
        }
        let mut target = Pair::default();
        let result = bind(Some(&mapping(&[("a", "5"), ("b", "bad")])), Some(&mut target));
        assert!(matches!(result, Err(BindError::Conversion { ref key, .. }) if key == "b"));
        assert_eq!(target.a, 5);
        assert_eq!(target.b, 0);
    }

    #[test]
    fn invalid_default_fails_even_when_present() {
        #[derive(Default)]
        struct BadDefault {
            n: i32,
        }
        impl Annotated for BadDefault {
            fn fields(&mut self) -> Vec<Field<'_>> {
                vec![Field::leaf("n", "n,default=many", &mut self.n)]
            }
        }
        let mut target = BadDefault::default();
        let err = bind(Some(&mapping(&[("n", "1")])), Some(&mut target)).unwrap_err();
        assert!(matches!(err, BindError::InvalidDefault { .. }));
    }

    #[test]
    fn root_name_strips_module_path() {
        assert_eq!(root_name::<DnsConfig>(), "DnsConfig");
        assert_eq!(root_name::<Vec<u8>>(), "Vec");
    }
}
