//! Synthetic text generation
//!
//! The synthesizer owns the random source and passes it in, so a seeded
//! `StdRng` makes every generated value reproducible.

use fake::faker::internet::en::SafeEmail;
use fake::faker::lorem::en::{Paragraph, Sentence};
use fake::faker::name::en::Name;
use fake::faker::phone_number::en::PhoneNumber;
use fake::Fake;
use rand::rngs::StdRng;
use std::fmt;

/// Source of plausible free-text answers
pub trait TextGenerator: Send + Sync + fmt::Debug {
    fn email(&self, rng: &mut StdRng) -> String;

    fn full_name(&self, rng: &mut StdRng) -> String;

    fn phone_number(&self, rng: &mut StdRng) -> String;

    /// One short sentence, used for short-answer questions
    fn sentence(&self, rng: &mut StdRng) -> String;

    /// A few sentences, used for paragraph questions
    fn paragraph(&self, rng: &mut StdRng) -> String;
}

/// `TextGenerator` backed by the `fake` crate's English locale
#[derive(Debug, Clone, Copy, Default)]
pub struct FakeText;

impl TextGenerator for FakeText {
    fn email(&self, rng: &mut StdRng) -> String {
        SafeEmail().fake_with_rng(rng)
    }

    fn full_name(&self, rng: &mut StdRng) -> String {
        Name().fake_with_rng(rng)
    }

    fn phone_number(&self, rng: &mut StdRng) -> String {
        PhoneNumber().fake_with_rng(rng)
    }

    fn sentence(&self, rng: &mut StdRng) -> String {
        Sentence(4..10).fake_with_rng(rng)
    }

    fn paragraph(&self, rng: &mut StdRng) -> String {
        Paragraph(2..4).fake_with_rng(rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_same_seed_same_text() {
        let mut a = StdRng::seed_from_u64(99);
        let mut b = StdRng::seed_from_u64(99);

        assert_eq!(FakeText.email(&mut a), FakeText.email(&mut b));
        assert_eq!(FakeText.full_name(&mut a), FakeText.full_name(&mut b));
        assert_eq!(FakeText.paragraph(&mut a), FakeText.paragraph(&mut b));
    }

    #[test]
    fn test_generated_text_shapes() {
        let mut rng = StdRng::seed_from_u64(1);

        assert!(FakeText.email(&mut rng).contains('@'));
        assert!(!FakeText.full_name(&mut rng).is_empty());
        assert!(!FakeText.phone_number(&mut rng).is_empty());
        assert!(!FakeText.sentence(&mut rng).is_empty());
    }
}
