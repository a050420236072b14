use crate::lister::EntryListing;

/// True when `class_name` occurs anywhere in the listing text.
///
/// This is a plain substring test over the whole listing, not a comparison
/// against individual entries: `Foo` matches `com/x/FooBar.class`, package
/// fragments match, and inner-class suffixes match.
pub fn contains_class(listing: &EntryListing, class_name: &str) -> bool {
    listing.as_str().contains(class_name)
}
