mod helpers;
mod wrapper;

use itertools::Itertools;
use log::{debug, trace};
use mockall_double::double;

#[double]
use self::wrapper::PdnsApi;

use self::helpers::{canonical, canonical_content, displayed, displayed_content, Rrset, RrsetChangeset};
use super::{Backend, BackendError, RecordType, Zone};

/// TTL applied to newly created records unless configured otherwise
pub const DEFAULT_RECORD_TTL: u32 = 86400;

/// A [`Backend`] talking to the PowerDNS HTTP API.
///
/// To create a backend, use the [`ApiBackend::from_config()`] function.
pub struct ApiBackend {
    api: PdnsApi,
    ttl: u32,
}

/// Configuration object for an [`ApiBackend`]. Must be supplied when creating a backend.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ApiBackendConfig<'a> {
    /// Base URL of the PowerDNS webserver, e.g. `http://127.0.0.1:8081`
    pub api_url: &'a str,
    /// The API key to authenticate with (sent as `X-API-Key`)
    pub api_key: &'a str,
    /// The server to manage; PowerDNS names its single native server `localhost`
    pub server_id: &'a str,
    /// TTL for newly created records. Uses [`DEFAULT_RECORD_TTL`] if unset
    pub ttl: Option<u32>,
}

impl ApiBackend {
    pub fn from_config(config: &ApiBackendConfig) -> Result<ApiBackend, BackendError> {
        let api = PdnsApi::try_new(config.api_url, config.api_key, config.server_id)?;
        Ok(ApiBackend {
            api,
            ttl: config.ttl.unwrap_or(DEFAULT_RECORD_TTL),
        })
    }
}

impl Backend for ApiBackend {
    fn get_zone(&self, name: &str) -> Result<Option<Zone>, BackendError> {
        let target = canonical(name);
        let mut zones = self
            .api
            .list_zones()?
            .into_iter()
            .filter(|z| {
                let zone_name = canonical(&z.name);
                target == zone_name || target.ends_with(&format!(".{}", zone_name))
            })
            .collect::<Vec<_>>();
        trace!("Zones containing {}: {:?}", name, zones);

        // Longest suffix wins, so records land in the most specific zone
        zones.sort_by(|a, b| canonical(&a.name).len().cmp(&canonical(&b.name).len()));
        Ok(zones.pop().map(|z| Zone {
            id: z.id,
            name: displayed(&z.name),
        }))
    }

    fn create_record(
        &self,
        zone_id: &str,
        name: &str,
        rtype: RecordType,
        content: &str,
    ) -> Result<(), BackendError> {
        let change = RrsetChangeset {
            rrsets: vec![Rrset::replace(
                canonical(name),
                rtype,
                self.ttl,
                canonical_content(rtype, content),
            )],
        };
        self.api.patch_rrsets(zone_id, &change)?;
        debug!("Created {} record at {} in zone {}", rtype, name, zone_id);
        Ok(())
    }

    fn delete_record(
        &self,
        zone_id: &str,
        name: &str,
        rtype: RecordType,
    ) -> Result<(), BackendError> {
        let change = RrsetChangeset {
            rrsets: vec![Rrset::delete(canonical(name), rtype)],
        };
        self.api.patch_rrsets(zone_id, &change)?;
        debug!("Deleted {} records at {} in zone {}", rtype, name, zone_id);
        Ok(())
    }

    fn rectify_zone(&self, zone_name: &str) -> Result<(), BackendError> {
        // The API accepts the canonical zone name as the zone id
        self.api.rectify(&canonical(zone_name))?;
        debug!("Rectified zone {}", zone_name);
        Ok(())
    }

    fn lookup_records(&self, name: &str, rtype: RecordType) -> Result<Vec<String>, BackendError> {
        let target = canonical(name);
        let rtype_str = rtype.to_string();
        let contents = self
            .api
            .search_records(name)?
            .into_iter()
            .filter(|hit| hit.object_type == "record" && !hit.disabled)
            .filter(|hit| hit.rtype.as_deref() == Some(rtype_str.as_str()))
            .filter(|hit| canonical(&hit.name) == target)
            .filter_map(|hit| hit.content)
            .map(|content| displayed_content(rtype, &content))
            .unique()
            .collect::<Vec<_>>();
        trace!("{} records at {}: {:?}", rtype, name, contents);
        Ok(contents)
    }
}

#[cfg(test)]
mod tests {
    use mockall::predicate::eq;

    use super::helpers::{ApiZone, SearchHit};
    use super::wrapper::MockPdnsApi;
    use super::*;

    fn backend(api: MockPdnsApi) -> ApiBackend {
        ApiBackend {
            api,
            ttl: DEFAULT_RECORD_TTL,
        }
    }

    fn zone(name: &str) -> ApiZone {
        ApiZone {
            id: name.to_string(),
            name: name.to_string(),
        }
    }

    fn record_hit(name: &str, rtype: &str, content: &str) -> SearchHit {
        SearchHit {
            name: name.to_string(),
            object_type: "record".to_string(),
            rtype: Some(rtype.to_string()),
            content: Some(content.to_string()),
            disabled: false,
        }
    }

    #[test]
    fn should_pick_longest_matching_zone() {
        let mut api = MockPdnsApi::new();
        api.expect_list_zones().returning(|| {
            Ok(vec![
                zone("com."),
                zone("example.com."),
                zone("sub.example.com."),
                zone("other.org."),
            ])
        });

        let zone = backend(api)
            .get_zone("test.sub.example.com")
            .unwrap()
            .unwrap();
        assert_eq!(zone.name, "sub.example.com");
        assert_eq!(zone.id, "sub.example.com.");
    }

    #[test]
    fn should_match_zone_apex() {
        let mut api = MockPdnsApi::new();
        api.expect_list_zones()
            .returning(|| Ok(vec![zone("example.com.")]));

        let zone = backend(api).get_zone("example.com").unwrap().unwrap();
        assert_eq!(zone.name, "example.com");
    }

    #[test]
    fn should_not_match_partial_label_suffix() {
        // "ample.com" is a string suffix of "test.example.com" but not a
        // parent domain of it
        let mut api = MockPdnsApi::new();
        api.expect_list_zones()
            .returning(|| Ok(vec![zone("ample.com.")]));

        assert_eq!(backend(api).get_zone("test.example.com").unwrap(), None);
    }

    #[test]
    fn should_return_none_without_containing_zone() {
        let mut api = MockPdnsApi::new();
        api.expect_list_zones()
            .returning(|| Ok(vec![zone("example.com.")]));

        assert_eq!(backend(api).get_zone("test.example.org").unwrap(), None);
    }

    #[test]
    fn should_resolve_reverse_zones_like_any_other() {
        let mut api = MockPdnsApi::new();
        api.expect_list_zones().returning(|| {
            Ok(vec![zone("example.com."), zone("1.1.10.in-addr.arpa.")])
        });

        let zone = backend(api)
            .get_zone("1.1.1.10.in-addr.arpa")
            .unwrap()
            .unwrap();
        assert_eq!(zone.name, "1.1.10.in-addr.arpa");
    }

    #[test]
    fn should_create_record_with_canonical_name() {
        let mut api = MockPdnsApi::new();
        api.expect_patch_rrsets()
            .withf(|zone_id, change| {
                let rrset = &change.rrsets[0];
                zone_id == "example.com."
                    && rrset.name == "test.example.com."
                    && rrset.rtype == "A"
                    && rrset.changetype == "REPLACE"
                    && rrset.ttl == Some(DEFAULT_RECORD_TTL)
                    && rrset.records[0].content == "10.1.1.1"
                    && !rrset.records[0].disabled
            })
            .times(1)
            .returning(|_, _| Ok(()));

        backend(api)
            .create_record("example.com.", "test.example.com", RecordType::A, "10.1.1.1")
            .unwrap();
    }

    #[test]
    fn should_canonicalize_ptr_target_on_create() {
        let mut api = MockPdnsApi::new();
        api.expect_patch_rrsets()
            .withf(|_, change| {
                let rrset = &change.rrsets[0];
                rrset.name == "1.1.1.10.in-addr.arpa."
                    && rrset.rtype == "PTR"
                    && rrset.records[0].content == "test.example.com."
            })
            .times(1)
            .returning(|_, _| Ok(()));

        backend(api)
            .create_record(
                "1.1.10.in-addr.arpa.",
                "1.1.1.10.in-addr.arpa",
                RecordType::Ptr,
                "test.example.com",
            )
            .unwrap();
    }

    #[test]
    fn should_delete_whole_rrset() {
        let mut api = MockPdnsApi::new();
        api.expect_patch_rrsets()
            .withf(|zone_id, change| {
                let rrset = &change.rrsets[0];
                zone_id == "example.com."
                    && rrset.name == "test.example.com."
                    && rrset.rtype == "A"
                    && rrset.changetype == "DELETE"
                    && rrset.ttl.is_none()
                    && rrset.records.is_empty()
            })
            .times(1)
            .returning(|_, _| Ok(()));

        backend(api)
            .delete_record("example.com.", "test.example.com", RecordType::A)
            .unwrap();
    }

    #[test]
    fn should_rectify_by_canonical_zone_name() {
        let mut api = MockPdnsApi::new();
        api.expect_rectify()
            .with(eq("example.com."))
            .times(1)
            .returning(|_| Ok(()));

        backend(api).rectify_zone("example.com").unwrap();
    }

    #[test]
    fn should_filter_lookup_results_by_name_and_type() {
        let mut api = MockPdnsApi::new();
        api.expect_search_records()
            .with(eq("test.example.com"))
            .returning(|_| {
                Ok(vec![
                    record_hit("test.example.com.", "A", "10.1.1.1"),
                    record_hit("test.example.com.", "AAAA", "2001:db8::1"),
                    record_hit("test2.example.com.", "A", "10.2.2.2"),
                    SearchHit {
                        name: "example.com.".to_string(),
                        object_type: "zone".to_string(),
                        rtype: None,
                        content: None,
                        disabled: false,
                    },
                ])
            });

        assert_eq!(
            backend(api)
                .lookup_records("test.example.com", RecordType::A)
                .unwrap(),
            vec!["10.1.1.1".to_string()]
        );
    }

    #[test]
    fn should_skip_disabled_records_and_dedupe() {
        let mut api = MockPdnsApi::new();
        api.expect_search_records().returning(|_| {
            Ok(vec![
                record_hit("test.example.com.", "A", "10.1.1.1"),
                record_hit("test.example.com.", "A", "10.1.1.1"),
                SearchHit {
                    disabled: true,
                    ..record_hit("test.example.com.", "A", "10.3.3.3")
                },
            ])
        });

        assert_eq!(
            backend(api)
                .lookup_records("test.example.com", RecordType::A)
                .unwrap(),
            vec!["10.1.1.1".to_string()]
        );
    }

    #[test]
    fn should_trim_root_dot_from_ptr_contents() {
        let mut api = MockPdnsApi::new();
        api.expect_search_records().returning(|_| {
            Ok(vec![record_hit(
                "1.1.1.10.in-addr.arpa.",
                "PTR",
                "test.example.com.",
            )])
        });

        assert_eq!(
            backend(api)
                .lookup_records("1.1.1.10.in-addr.arpa", RecordType::Ptr)
                .unwrap(),
            vec!["test.example.com".to_string()]
        );
    }
}
