#[cfg(test)]
pub mod test {
    use crate::field::{Annotated, Field};
    use crate::types::Mapping;

    pub fn mapping(pairs: &[(&str, &str)]) -> Mapping {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    /// A DNS load-balancer config, the kind of thing read from resource annotations.
    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct DnsConfig {
        pub ttl: i32,
        pub strategy: String,
        pub geo_tags: Vec<String>,
        pub weights: Vec<u8>,
        pub ready: bool,
        pub ratio: f64,
        pub infoblox: Infoblox,
        /// Not tagged, never bound.
        pub scratch: String,
    }

    impl Annotated for DnsConfig {
        fn fields(&mut self) -> Vec<Field<'_>> {
            vec![
                Field::leaf("ttl", "dns-ttl-seconds,default=30", &mut self.ttl),
                Field::leaf("strategy", "strategy,default=roundRobin", &mut self.strategy),
                Field::leaf("geo_tags", "geo-tags,default=[us,eu]", &mut self.geo_tags),
                Field::leaf("weights", "weights,default=[1,2,3]", &mut self.weights),
                Field::leaf("ready", "ready,default=true", &mut self.ready),
                Field::leaf("ratio", "ratio,default=0.5", &mut self.ratio),
                Field::nested("infoblox", "infoblox", &mut self.infoblox),
                Field::leaf("scratch", "", &mut self.scratch),
            ]
        }
    }

    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct Infoblox {
        pub host: String,
        pub port: u16,
    }

    impl Annotated for Infoblox {
        fn fields(&mut self) -> Vec<Field<'_>> {
            vec![
                Field::leaf("host", "host", &mut self.host),
                Field::leaf("port", "port,default=443", &mut self.port),
            ]
        }
    }

    // -- Nested prefix composition ---------------------------------------------

    #[derive(Debug, Default, PartialEq)]
    pub struct Outer {
        pub nested: Nested,
        pub flat: Flat,
    }

    impl Annotated for Outer {
        fn fields(&mut self) -> Vec<Field<'_>> {
            vec![
                Field::nested("nested", "outer", &mut self.nested),
                Field::nested("flat", "", &mut self.flat),
            ]
        }
    }

    #[derive(Debug, Default, PartialEq)]
    pub struct Nested {
        pub value: String,
        pub deeper: Deeper,
    }

    impl Annotated for Nested {
        fn fields(&mut self) -> Vec<Field<'_>> {
            vec![
                Field::leaf("value", "inner", &mut self.value),
                Field::nested("deeper", "deep", &mut self.deeper),
            ]
        }
    }

    #[derive(Debug, Default, PartialEq)]
    pub struct Deeper {
        pub leaf: String,
    }

    impl Annotated for Deeper {
        fn fields(&mut self) -> Vec<Field<'_>> {
            vec![Field::leaf("leaf", "leaf", &mut self.leaf)]
        }
    }

    #[derive(Debug, Default, PartialEq)]
    pub struct Flat {
        pub level: i32,
    }

    impl Annotated for Flat {
        fn fields(&mut self) -> Vec<Field<'_>> {
            vec![Field::leaf("level", "level", &mut self.level)]
        }
    }

    #[derive(Debug, Default, PartialEq)]
    pub struct Twins {
        pub left: Port,
        pub right: Port,
    }

    impl Annotated for Twins {
        fn fields(&mut self) -> Vec<Field<'_>> {
            vec![
                Field::nested("left", "left", &mut self.left),
                Field::nested("right", "right", &mut self.right),
            ]
        }
    }

    #[derive(Debug, Default, PartialEq)]
    pub struct Port {
        pub port: u16,
    }

    impl Annotated for Port {
        fn fields(&mut self) -> Vec<Field<'_>> {
            vec![Field::leaf("port", "port", &mut self.port)]
        }
    }

    // -- Required and protected fields ----------------------------------------

    #[derive(Debug, Default, PartialEq)]
    pub struct RequiredConfig {
        pub cluster: Cluster,
    }

    impl Annotated for RequiredConfig {
        fn fields(&mut self) -> Vec<Field<'_>> {
            vec![Field::nested("cluster", "cluster", &mut self.cluster)]
        }
    }

    #[derive(Debug, Default, PartialEq)]
    pub struct Cluster {
        pub name: String,
    }

    impl Annotated for Cluster {
        fn fields(&mut self) -> Vec<Field<'_>> {
            vec![Field::leaf(
                "name",
                "name,require=true,default=fallback",
                &mut self.name,
            )]
        }
    }

    #[derive(Debug, Default, PartialEq)]
    pub struct Protected {
        pub count: i32,
        pub name: String,
        pub zones: Vec<String>,
        pub enabled: bool,
    }

    impl Annotated for Protected {
        fn fields(&mut self) -> Vec<Field<'_>> {
            vec![
                Field::leaf("count", "count,protected=true", &mut self.count),
                Field::leaf("name", "name,protected=true", &mut self.name),
                Field::leaf("zones", "zones,protected=true", &mut self.zones),
                Field::leaf("enabled", "enabled,protected=true", &mut self.enabled),
            ]
        }
    }

    #[test]
    fn fixture_binds_defaults() {
        let mut config = DnsConfig::default();
        config.bind_from(&mapping(&[])).unwrap();
        assert_eq!(config.ttl, 30);
        assert_eq!(config.infoblox.port, 443);
    }
}
