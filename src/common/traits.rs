//! Trait definitions for site records

use rust_decimal::Decimal;

/// Capability set the allocators need from a site
///
/// The allocators never look at anything beyond these five accessors, so
/// any record that can report and overwrite its gold and guardian count can
/// be planned over. Implementations enforce no invariants of their own;
/// callers are trusted not to store negative gold.
///
/// # Example
///
/// ```ignore
/// struct Mine {
///     label: String,
///     ore: Decimal,
///     sentries: u32,
/// }
///
/// impl SiteRecord for Mine {
///     fn name(&self) -> &str { &self.label }
///     fn gold(&self) -> Decimal { self.ore }
///     fn set_gold(&mut self, gold: Decimal) { self.ore = gold; }
///     fn guardians(&self) -> u32 { self.sentries }
///     fn set_guardians(&mut self, guardians: u32) { self.sentries = guardians; }
/// }
/// ```
pub trait SiteRecord {
    /// Identifier, unique within a registry
    fn name(&self) -> &str;

    /// Gold still held by the site
    fn gold(&self) -> Decimal;

    /// Overwrite the gold held by the site
    fn set_gold(&mut self, gold: Decimal);

    /// Guardians still defending the site
    ///
    /// Zero means the site is undefended and any deployed force takes
    /// all of the remaining gold.
    fn guardians(&self) -> u32;

    /// Overwrite the guardian count
    fn set_guardians(&mut self, guardians: u32);

    /// Returns true if no guardians remain
    fn is_undefended(&self) -> bool {
        self.guardians() == 0
    }
}
