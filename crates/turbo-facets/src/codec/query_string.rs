//! Address bar <-> listing state.
//!
//! Decoding is total: malformed numbers fall back to neutral values, unknown
//! keys are skipped, and inverted price bounds are swapped. Encoding emits
//! keys in a fixed order and omits defaults, so a canonical query string
//! survives any number of decode/encode cycles unchanged.

use std::collections::BTreeMap;

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, CONTROLS};
use serde::{Deserialize, Serialize};
use url::form_urlencoded;

use crate::catalog::{canonical_category, ListingSnapshot};
use crate::codec::{slugify, CategoryRouting, CodecConfig, Location};
use crate::filter::{ActiveFilters, SearchHits};
use crate::listing::{ListingQuery, SortOption};

const KEY_SEARCH: &str = "search";
const KEY_CATEGORY: &str = "category";
const KEY_BRANDS: &str = "brands";
const KEY_MIN_PRICE: &str = "minPrice";
const KEY_MAX_PRICE: &str = "maxPrice";
const KEY_CPO: &str = "cpo";
const KEY_PAGE: &str = "page";
const KEY_SORT: &str = "sortBy";

const RESERVED_KEYS: [&str; 8] = [
    KEY_SEARCH,
    KEY_CATEGORY,
    KEY_BRANDS,
    KEY_MIN_PRICE,
    KEY_MAX_PRICE,
    KEY_CPO,
    KEY_PAGE,
    KEY_SORT,
];

/// Characters escaped inside one category path segment.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Everything the address bar says about a listing view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListingState {
    pub filters: ActiveFilters,
    /// Current page (1-indexed).
    pub page: u32,
    pub sort: SortOption,
}

impl Default for ListingState {
    fn default() -> Self {
        Self::new(ActiveFilters::default())
    }
}

impl ListingState {
    pub fn new(filters: ActiveFilters) -> Self {
        Self {
            filters,
            page: 1,
            sort: SortOption::default(),
        }
    }

    pub fn with_page(mut self, page: u32) -> Self {
        self.page = page.max(1);
        self
    }

    pub fn with_sort(mut self, sort: SortOption) -> Self {
        self.sort = sort;
        self
    }

    /// Listing query for this state.
    pub fn to_query(&self, hits: Option<&SearchHits>, per_page: u32) -> ListingQuery {
        ListingQuery::new(&self.filters, hits)
            .with_sort(self.sort)
            .with_pagination(self.page, per_page)
    }
}

/// Bidirectional mapping between `ListingState` and a `Location`.
///
/// Custom and range filters are keyed by the slug of their attribute name.
/// When the codec knows the listing's attribute names, slugs decode back to
/// those names and unrecognized keys are ignored; a codec with no attribute
/// names keeps every non-reserved key, using the slug itself as the name.
#[derive(Debug, Clone, Default)]
pub struct QueryCodec {
    config: CodecConfig,
    /// slug -> attribute name
    attributes: BTreeMap<String, String>,
    /// slug -> range attribute name
    range_attributes: BTreeMap<String, String>,
}

impl QueryCodec {
    pub fn new(config: CodecConfig) -> Self {
        Self {
            config,
            attributes: BTreeMap::new(),
            range_attributes: BTreeMap::new(),
        }
    }

    /// Codec that knows every attribute present in `snapshot`.
    pub fn for_snapshot(config: CodecConfig, snapshot: &ListingSnapshot) -> Self {
        Self::new(config)
            .with_attributes(snapshot.attribute_names())
            .with_range_attributes(snapshot.range_attribute_names())
    }

    /// Register dropdown attribute names.
    pub fn with_attributes<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        register(&mut self.attributes, names);
        self.warn_bound_collisions();
        self
    }

    /// Register range attribute names.
    pub fn with_range_attributes<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        register(&mut self.range_attributes, names);
        self.warn_bound_collisions();
        self
    }

    /// Dropdown slugs that equal a range attribute's `-min`/`-max` key lose
    /// numeric values to the range filter.
    fn warn_bound_collisions(&self) {
        for (slug, range) in &self.range_attributes {
            for key in [format!("{}-min", slug), format!("{}-max", slug)] {
                if let Some(attribute) = self.attributes.get(&key) {
                    tracing::warn!(attribute = %attribute, range = %range, key = %key, "attribute slug shadows a range bound");
                }
            }
        }
    }

    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// Decode a full location; the category comes from the path or the
    /// query depending on the routing convention.
    pub fn decode(&self, location: &Location) -> ListingState {
        let mut state = self.decode_query(&location.query);
        if let CategoryRouting::PathSegment { prefix } = &self.config.routing {
            let category = category_from_path(prefix, &location.path);
            state.filters = state.filters.with_category(category.as_deref());
        }
        state
    }

    /// Decode a query string (without the leading `?`).
    pub fn decode_query(&self, query: &str) -> ListingState {
        let query = query.strip_prefix('?').unwrap_or(query);
        let open = self.attributes.is_empty() && self.range_attributes.is_empty();

        let mut filters = ActiveFilters::new();
        let mut min_price = 0;
        let mut max_price = None;
        let mut page = 1;
        let mut sort = self.config.default_sort;
        let mut ranges: Vec<(String, Option<f64>, Option<f64>)> = Vec::new();

        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            match &*key {
                KEY_SEARCH => filters = filters.with_search(&*value),
                KEY_CATEGORY => {
                    if matches!(self.config.routing, CategoryRouting::QueryParam { .. }) {
                        filters = filters.with_category(Some(&*value));
                    }
                }
                KEY_BRANDS => filters = filters.with_brands(value.split(',')),
                KEY_MIN_PRICE => min_price = value.trim().parse().unwrap_or(0),
                KEY_MAX_PRICE => max_price = value.trim().parse::<i64>().ok().filter(|m| *m >= 0),
                KEY_CPO => filters = filters.with_cpo(matches!(&*value, "true" | "1")),
                KEY_PAGE => {
                    page = value
                        .trim()
                        .parse::<u32>()
                        .ok()
                        .filter(|p| *p > 0)
                        .unwrap_or(1)
                }
                KEY_SORT => {
                    sort = SortOption::from_key(value.trim()).unwrap_or(self.config.default_sort)
                }
                other => {
                    let bound = parse_bound(&value);
                    let custom = self.custom_key(other, open);
                    // A non-numeric `-min`/`-max` value belongs to a dropdown
                    // attribute of that slug, when there is one.
                    match self.range_key(other, open) {
                        Some((name, is_min)) if bound.is_some() || custom.is_none() => {
                            match ranges.iter_mut().find(|(n, _, _)| *n == name) {
                                Some(entry) if is_min => entry.1 = bound,
                                Some(entry) => entry.2 = bound,
                                None if is_min => ranges.push((name, bound, None)),
                                None => ranges.push((name, None, bound)),
                            }
                        }
                        _ => match custom {
                            Some(name) if !value.is_empty() => {
                                filters = filters.with_custom(name, &*value);
                            }
                            Some(_) => {}
                            None => tracing::trace!(key = other, "ignoring unknown query key"),
                        },
                    }
                }
            }
        }

        filters = filters.with_price(min_price, max_price);
        for (name, min, max) in ranges {
            filters = filters.with_range(name, min, max);
        }

        ListingState {
            filters,
            page,
            sort,
        }
    }

    /// Encode a listing state as a location.
    pub fn encode(&self, state: &ListingState) -> Location {
        let path = match &self.config.routing {
            CategoryRouting::PathSegment { prefix } => {
                category_path(prefix, state.filters.category.as_deref())
            }
            CategoryRouting::QueryParam { path } => path.clone(),
        };
        Location::new(path, self.encode_query(state))
    }

    /// Encode only the query string (without the leading `?`).
    pub fn encode_query(&self, state: &ListingState) -> String {
        let filters = &state.filters;
        let mut query = form_urlencoded::Serializer::new(String::new());

        if !filters.search.is_empty() {
            query.append_pair(KEY_SEARCH, &filters.search);
        }
        if let (CategoryRouting::QueryParam { .. }, Some(category)) =
            (&self.config.routing, &filters.category)
        {
            query.append_pair(KEY_CATEGORY, category);
        }
        if !filters.brands.is_empty() {
            query.append_pair(KEY_BRANDS, &filters.brands.join(","));
        }
        if filters.min_price > 0 {
            query.append_pair(KEY_MIN_PRICE, &filters.min_price.to_string());
        }
        if let Some(max) = filters.max_price {
            query.append_pair(KEY_MAX_PRICE, &max.to_string());
        }
        for custom in &filters.custom_filters {
            let key = slugify(&custom.name);
            if !key.is_empty() && !custom.value.is_empty() {
                query.append_pair(&key, &custom.value);
            }
        }
        for range in &filters.range_filters {
            let key = slugify(&range.name);
            if key.is_empty() {
                continue;
            }
            if let Some(min) = range.min {
                query.append_pair(&format!("{}-min", key), &min.to_string());
            }
            if let Some(max) = range.max {
                query.append_pair(&format!("{}-max", key), &max.to_string());
            }
        }
        if filters.is_cpo {
            query.append_pair(KEY_CPO, "true");
        }
        if state.page > 1 {
            query.append_pair(KEY_PAGE, &state.page.to_string());
        }
        if state.sort != self.config.default_sort {
            query.append_pair(KEY_SORT, state.sort.as_key());
        }

        query.finish()
    }

    /// Resolve `{slug}-min` / `{slug}-max` to a range attribute name.
    fn range_key(&self, key: &str, open: bool) -> Option<(String, bool)> {
        let (stem, is_min) = if let Some(stem) = key.strip_suffix("-min") {
            (stem, true)
        } else {
            (key.strip_suffix("-max")?, false)
        };
        if open {
            return (!stem.is_empty()).then(|| (stem.to_string(), is_min));
        }
        self.range_attributes
            .get(stem)
            .map(|name| (name.clone(), is_min))
    }

    fn custom_key(&self, key: &str, open: bool) -> Option<String> {
        if open {
            return (!key.is_empty()).then(|| key.to_string());
        }
        self.attributes.get(key).cloned()
    }
}

fn register<I, S>(map: &mut BTreeMap<String, String>, names: I)
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    for name in names {
        let name = name.as_ref();
        let slug = slugify(name);
        if slug.is_empty() || RESERVED_KEYS.contains(&slug.as_str()) {
            tracing::warn!(attribute = name, slug = %slug, "attribute slug unusable as query key");
            continue;
        }
        if let Some(existing) = map.get(&slug) {
            if existing != name {
                tracing::warn!(attribute = name, existing = %existing, slug = %slug, "attribute slug collision");
            }
            continue;
        }
        map.insert(slug, name.to_string());
    }
}

/// Finite numbers only; anything else is an unset bound.
fn parse_bound(value: &str) -> Option<f64> {
    value.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

fn category_from_path(prefix: &str, path: &str) -> Option<String> {
    let prefix = prefix.trim_end_matches('/');
    let rest = path.strip_prefix(prefix)?;
    if !rest.is_empty() && !rest.starts_with('/') {
        return None;
    }
    let decoded = percent_decode_str(rest).decode_utf8_lossy();
    let category = canonical_category(&decoded);
    (!category.is_empty()).then_some(category)
}

fn category_path(prefix: &str, category: Option<&str>) -> String {
    let mut path = prefix.trim_end_matches('/').to_string();
    match category {
        Some(category) => {
            for segment in category.split('/') {
                path.push('/');
                path.extend(utf8_percent_encode(segment, PATH_SEGMENT));
            }
        }
        None if path.is_empty() => path.push('/'),
        None => {}
    }
    path
}
