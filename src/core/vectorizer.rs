use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::{FeatureVector, Profile};

/// Budgets are expressed in thousands and capped at this value
pub const BUDGET_CAP: f64 = 5.0;

/// Divisor that scales a monthly budget into vector units
pub const BUDGET_SCALE: f64 = 1000.0;

/// Matchable profile attributes, in vector order
///
/// The order of [`ProfileField::ALL`] is the order fields are written into a
/// feature vector. Changing it makes old and new vectors incomparable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ProfileField {
    Campus,
    Gender,
    FoodPreference,
    SocialPreference,
    SleepSchedule,
    StudyStyle,
    Smoking,
    Drinking,
    GuestFriendly,
    Hobbies,
    LanguagesSpoken,
    Budget,
}

impl ProfileField {
    pub const ALL: [ProfileField; 12] = [
        ProfileField::Campus,
        ProfileField::Gender,
        ProfileField::FoodPreference,
        ProfileField::SocialPreference,
        ProfileField::SleepSchedule,
        ProfileField::StudyStyle,
        ProfileField::Smoking,
        ProfileField::Drinking,
        ProfileField::GuestFriendly,
        ProfileField::Hobbies,
        ProfileField::LanguagesSpoken,
        ProfileField::Budget,
    ];

    /// Wire name of the field
    pub fn name(&self) -> &'static str {
        match self {
            ProfileField::Campus => "campus",
            ProfileField::Gender => "gender",
            ProfileField::FoodPreference => "foodPreference",
            ProfileField::SocialPreference => "socialPreference",
            ProfileField::SleepSchedule => "sleepSchedule",
            ProfileField::StudyStyle => "studyStyle",
            ProfileField::Smoking => "smoking",
            ProfileField::Drinking => "drinking",
            ProfileField::GuestFriendly => "guestFriendly",
            ProfileField::Hobbies => "hobbies",
            ProfileField::LanguagesSpoken => "languagesSpoken",
            ProfileField::Budget => "budget",
        }
    }

    /// Look up a field by its wire name
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|field| field.name() == name)
    }

    /// Fields stored as comma-joined multi-selects
    pub fn is_multi_select(&self) -> bool {
        matches!(self, ProfileField::Hobbies | ProfileField::LanguagesSpoken)
    }

    fn value<'a>(&self, profile: &'a Profile) -> FieldValue<'a> {
        match self {
            ProfileField::Campus => FieldValue::Text(profile.campus.as_deref()),
            ProfileField::Gender => FieldValue::Text(profile.gender.as_deref()),
            ProfileField::FoodPreference => FieldValue::Text(profile.food_preference.as_deref()),
            ProfileField::SocialPreference => FieldValue::Text(profile.social_preference.as_deref()),
            ProfileField::SleepSchedule => FieldValue::Text(profile.sleep_schedule.as_deref()),
            ProfileField::StudyStyle => FieldValue::Text(profile.study_style.as_deref()),
            ProfileField::Smoking => FieldValue::Flag(profile.smoking),
            ProfileField::Drinking => FieldValue::Flag(profile.drinking),
            ProfileField::GuestFriendly => FieldValue::Flag(profile.guest_friendly),
            ProfileField::Hobbies => FieldValue::Text(profile.hobbies.as_deref()),
            ProfileField::LanguagesSpoken => FieldValue::Text(profile.languages_spoken.as_deref()),
            ProfileField::Budget => FieldValue::Amount(profile.budget),
        }
    }
}

enum FieldValue<'a> {
    Text(Option<&'a str>),
    Flag(Option<bool>),
    Amount(Option<f64>),
}

/// Per-field repetition weights
///
/// A field with weight `n` occupies `n` consecutive equal slots in the vector,
/// which amplifies its influence on cosine similarity. Weights below 1 are
/// treated as 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldWeights {
    pub campus: u32,
    pub gender: u32,
    pub food_preference: u32,
    pub social_preference: u32,
    pub sleep_schedule: u32,
    pub study_style: u32,
    pub smoking: u32,
    pub drinking: u32,
    pub guest_friendly: u32,
    pub hobbies: u32,
    pub languages_spoken: u32,
    pub budget: u32,
}

impl FieldWeights {
    /// Uniform table, every field weighted equally
    pub fn uniform(weight: u32) -> Self {
        Self {
            campus: weight,
            gender: weight,
            food_preference: weight,
            social_preference: weight,
            sleep_schedule: weight,
            study_style: weight,
            smoking: weight,
            drinking: weight,
            guest_friendly: weight,
            hobbies: weight,
            languages_spoken: weight,
            budget: weight,
        }
    }

    /// Effective weight of a field
    #[inline]
    pub fn get(&self, field: ProfileField) -> usize {
        let raw = match field {
            ProfileField::Campus => self.campus,
            ProfileField::Gender => self.gender,
            ProfileField::FoodPreference => self.food_preference,
            ProfileField::SocialPreference => self.social_preference,
            ProfileField::SleepSchedule => self.sleep_schedule,
            ProfileField::StudyStyle => self.study_style,
            ProfileField::Smoking => self.smoking,
            ProfileField::Drinking => self.drinking,
            ProfileField::GuestFriendly => self.guest_friendly,
            ProfileField::Hobbies => self.hobbies,
            ProfileField::LanguagesSpoken => self.languages_spoken,
            ProfileField::Budget => self.budget,
        };
        raw.max(1) as usize
    }

    /// Sum of all effective weights, i.e. the vector dimension
    pub fn total(&self) -> usize {
        ProfileField::ALL.iter().map(|field| self.get(*field)).sum()
    }
}

impl Default for FieldWeights {
    fn default() -> Self {
        Self {
            hobbies: 1,
            languages_spoken: 1,
            ..Self::uniform(2)
        }
    }
}

/// Known values for categorical fields
///
/// Values are stored normalized. A value's code is its 1-based position in
/// the field's list, so unrelated values never share a code.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryVocabulary {
    values: BTreeMap<ProfileField, Vec<String>>,
}

impl CategoryVocabulary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the known values of a field, replacing any previous list
    pub fn with_values<I, S>(mut self, field: ProfileField, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut normalized: Vec<String> = Vec::new();
        for value in values {
            let value = normalize_text(value.as_ref());
            if !value.is_empty() && !normalized.contains(&value) {
                normalized.push(value);
            }
        }
        self.values.insert(field, normalized);
        self
    }

    /// Code for an already normalized value, 0 when unknown
    ///
    /// Multi-select fields are coded by their first selection.
    pub fn code(&self, field: ProfileField, normalized: &str) -> f64 {
        let lookup = if field.is_multi_select() {
            first_selection(normalized)
        } else {
            normalized
        };

        self.values
            .get(&field)
            .and_then(|known| known.iter().position(|v| v == lookup))
            .map(|index| (index + 1) as f64)
            .unwrap_or(0.0)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// How categorical strings become scalars
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CategoricalEncoding {
    /// First UTF-16 code unit of the normalized value, modulo 10.
    /// Collision prone ("surrey" and "smoking" share a code) but keeps scores
    /// identical to the ones already shown to users.
    #[default]
    FirstChar,
    /// Dictionary lookup against known values
    Vocabulary(CategoryVocabulary),
}

/// Turns profiles into weighted feature vectors
///
/// Pure and deterministic: the same profile and configuration always yield
/// the same vector. Missing or malformed fields encode to 0.
#[derive(Debug, Clone, Default)]
pub struct Vectorizer {
    weights: FieldWeights,
    encoding: CategoricalEncoding,
}

impl Vectorizer {
    pub fn new(weights: FieldWeights, encoding: CategoricalEncoding) -> Self {
        Self { weights, encoding }
    }

    pub fn with_default_weights() -> Self {
        Self::default()
    }

    pub fn weights(&self) -> &FieldWeights {
        &self.weights
    }

    /// Length of every vector this vectorizer produces
    pub fn dimension(&self) -> usize {
        self.weights.total()
    }

    /// Build the feature vector for a profile
    pub fn vectorize(&self, profile: &Profile) -> FeatureVector {
        let mut values = Vec::with_capacity(self.dimension());

        for field in ProfileField::ALL {
            let scalar = self.encode_field(profile, field);
            let weight = self.weights.get(field);
            values.extend(std::iter::repeat(scalar).take(weight));
        }

        FeatureVector(values)
    }

    /// Scalar for a single field, before weighting
    pub fn encode_field(&self, profile: &Profile, field: ProfileField) -> f64 {
        match field.value(profile) {
            FieldValue::Flag(flag) => encode_flag(flag),
            FieldValue::Amount(amount) => encode_budget(amount),
            FieldValue::Text(text) => {
                let normalized = normalize_text(text.unwrap_or_default());
                if normalized.is_empty() {
                    return 0.0;
                }
                match &self.encoding {
                    CategoricalEncoding::FirstChar => first_char_code(&normalized),
                    CategoricalEncoding::Vocabulary(vocabulary) => {
                        vocabulary.code(field, &normalized)
                    }
                }
            }
        }
    }
}

/// Trim surrounding whitespace and lowercase
///
/// A byte order mark counts as whitespace, as it does for browser clients.
#[inline]
pub fn normalize_text(value: &str) -> String {
    value
        .trim_matches(|c: char| c.is_whitespace() || c == '\u{FEFF}')
        .to_lowercase()
}

/// First non-empty entry of a comma-joined list
fn first_selection(value: &str) -> &str {
    value
        .split(',')
        .map(|entry| entry.trim_matches(|c: char| c.is_whitespace() || c == '\u{FEFF}'))
        .find(|entry| !entry.is_empty())
        .unwrap_or("")
}

#[inline]
fn encode_flag(flag: Option<bool>) -> f64 {
    if flag.unwrap_or(false) { 1.0 } else { 0.0 }
}

/// `min(budget / 1000, 5)`, or 0 when absent or not a finite number
#[inline]
pub fn encode_budget(budget: Option<f64>) -> f64 {
    match budget {
        Some(value) if value.is_finite() => (value / BUDGET_SCALE).min(BUDGET_CAP),
        _ => 0.0,
    }
}

/// First UTF-16 code unit modulo 10, 0 for an empty string
#[inline]
pub fn first_char_code(value: &str) -> f64 {
    value
        .encode_utf16()
        .next()
        .map(|unit| (unit % 10) as f64)
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_weight_table() {
        let weights = FieldWeights::default();
        assert_eq!(weights.get(ProfileField::Campus), 2);
        assert_eq!(weights.get(ProfileField::Hobbies), 1);
        assert_eq!(weights.get(ProfileField::LanguagesSpoken), 1);
        assert_eq!(weights.get(ProfileField::Budget), 2);
        assert_eq!(weights.total(), 22);
    }

    #[test]
    fn test_zero_weight_counts_as_one() {
        let weights = FieldWeights { campus: 0, ..FieldWeights::uniform(1) };
        assert_eq!(weights.get(ProfileField::Campus), 1);
        assert_eq!(weights.total(), 12);
    }

    #[test]
    fn test_first_char_code() {
        // 's' = 115, 'r' = 114
        assert_eq!(first_char_code("surrey"), 5.0);
        assert_eq!(first_char_code("richmond"), 4.0);
        assert_eq!(first_char_code(""), 0.0);
    }

    #[test]
    fn test_budget_encoding() {
        assert_eq!(encode_budget(Some(1000.0)), 1.0);
        assert_eq!(encode_budget(Some(2500.0)), 2.5);
        assert_eq!(encode_budget(Some(9000.0)), 5.0);
        assert_eq!(encode_budget(None), 0.0);
        assert_eq!(encode_budget(Some(f64::NAN)), 0.0);
        assert_eq!(encode_budget(Some(f64::INFINITY)), 0.0);
    }

    #[test]
    fn test_categorical_normalization() {
        let vectorizer = Vectorizer::with_default_weights();
        let mut a = Profile::new("a");
        a.campus = Some("  Surrey ".to_string());
        let mut b = Profile::new("b");
        b.campus = Some("surrey".to_string());

        assert_eq!(
            vectorizer.encode_field(&a, ProfileField::Campus),
            vectorizer.encode_field(&b, ProfileField::Campus)
        );
    }

    #[test]
    fn test_whitespace_only_string_is_zero() {
        let vectorizer = Vectorizer::with_default_weights();
        let mut profile = Profile::new("a");
        profile.hobbies = Some("   ".to_string());

        assert_eq!(vectorizer.encode_field(&profile, ProfileField::Hobbies), 0.0);
    }

    #[test]
    fn test_weighted_runs_are_contiguous() {
        let vectorizer = Vectorizer::with_default_weights();
        let mut profile = Profile::new("a");
        profile.campus = Some("Surrey".to_string());
        profile.smoking = Some(true);
        profile.budget = Some(1500.0);

        let vector = vectorizer.vectorize(&profile);
        let v = vector.as_slice();

        assert_eq!(v.len(), 22);
        assert_eq!(&v[0..2], &[5.0, 5.0]);
        // campus, gender, food, social, sleep, study = 12 slots, then smoking
        assert_eq!(&v[12..14], &[1.0, 1.0]);
        assert_eq!(&v[20..22], &[1.5, 1.5]);
    }

    #[test]
    fn test_vocabulary_encoding_removes_collisions() {
        let vocabulary = CategoryVocabulary::new()
            .with_values(ProfileField::Campus, ["Surrey", "Richmond", "Langley"])
            .with_values(ProfileField::SleepSchedule, ["Early bird", "Night owl"]);
        let vectorizer = Vectorizer::new(
            FieldWeights::default(),
            CategoricalEncoding::Vocabulary(vocabulary),
        );

        let mut surrey = Profile::new("a");
        surrey.campus = Some("SURREY".to_string());
        let mut unknown = Profile::new("b");
        unknown.campus = Some("Sydney".to_string());

        assert_eq!(vectorizer.encode_field(&surrey, ProfileField::Campus), 1.0);
        assert_eq!(vectorizer.encode_field(&unknown, ProfileField::Campus), 0.0);
        assert_eq!(vectorizer.vectorize(&surrey).len(), vectorizer.dimension());
    }

    #[test]
    fn test_multi_select_uses_first_selection() {
        let vocabulary = CategoryVocabulary::new()
            .with_values(ProfileField::Hobbies, ["Gaming", "Music", "Cooking"])
            .with_values(ProfileField::Campus, ["Surrey", "Richmond"]);
        let vectorizer = Vectorizer::new(
            FieldWeights::default(),
            CategoricalEncoding::Vocabulary(vocabulary),
        );

        let mut profile = Profile::new("a");
        profile.hobbies = Some("Music, Gaming".to_string());
        profile.campus = Some("Surrey,Richmond".to_string());

        assert_eq!(vectorizer.encode_field(&profile, ProfileField::Hobbies), 2.0);
        // Single-select fields are looked up whole
        assert_eq!(vectorizer.encode_field(&profile, ProfileField::Campus), 0.0);

        profile.hobbies = Some(" ,Cooking".to_string());
        assert_eq!(vectorizer.encode_field(&profile, ProfileField::Hobbies), 3.0);
    }

    #[test]
    fn test_byte_order_mark_is_trimmed() {
        let vectorizer = Vectorizer::with_default_weights();
        let mut profile = Profile::new("a");
        profile.campus = Some("\u{FEFF}Surrey".to_string());

        assert_eq!(normalize_text("\u{FEFF} Surrey\u{FEFF}"), "surrey");
        assert_eq!(vectorizer.encode_field(&profile, ProfileField::Campus), 5.0);
    }

    #[test]
    fn test_field_names_round_trip() {
        for field in ProfileField::ALL {
            assert_eq!(ProfileField::from_name(field.name()), Some(field));
        }
        assert_eq!(ProfileField::from_name("pets"), None);
    }
}
