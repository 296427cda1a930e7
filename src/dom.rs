//! Element lookup over a parsed page.
//!
//! `find`/`find_all` search every descendant of a scope in document order
//! (the scope itself excluded); `children` only looks one level down.

use scraper::ElementRef;

/// A tag name with an optional class the element must carry.
#[derive(Debug, Clone, Copy)]
pub struct Tag {
    pub name: &'static str,
    pub class: Option<&'static str>,
}

impl Tag {
    pub const fn new(name: &'static str) -> Self {
        Tag { name, class: None }
    }

    pub const fn with_class(name: &'static str, class: &'static str) -> Self {
        Tag {
            name,
            class: Some(class),
        }
    }

    pub fn matches(&self, element: &ElementRef<'_>) -> bool {
        let value = element.value();
        if !value.name().eq_ignore_ascii_case(self.name) {
            return false;
        }
        match self.class {
            Some(class) => value.classes().any(|c| c == class),
            None => true,
        }
    }
}

pub fn find_all<'a>(scope: ElementRef<'a>, tag: Tag) -> impl Iterator<Item = ElementRef<'a>> {
    scope
        .descendants()
        .skip(1)
        .filter_map(ElementRef::wrap)
        .filter(move |element| tag.matches(element))
}

pub fn find<'a>(scope: ElementRef<'a>, tag: Tag) -> Option<ElementRef<'a>> {
    find_all(scope, tag).next()
}

pub fn children<'a>(scope: ElementRef<'a>, tag: Tag) -> impl Iterator<Item = ElementRef<'a>> {
    scope
        .children()
        .filter_map(ElementRef::wrap)
        .filter(move |element| tag.matches(element))
}

pub fn find_child<'a>(scope: ElementRef<'a>, tag: Tag) -> Option<ElementRef<'a>> {
    children(scope, tag).next()
}

/// Text of every descendant text node, each trimmed, joined with no separator.
pub fn stripped_text(element: ElementRef<'_>) -> String {
    element.text().map(str::trim).collect()
}

pub fn attr<'a>(element: ElementRef<'a>, name: &str) -> Option<&'a str> {
    element.value().attr(name)
}
