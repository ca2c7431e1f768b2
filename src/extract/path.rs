//! Path selectors: an XPath subset evaluated over the `scraper` tree
//!
//! Supported syntax:
//!
//! - absolute paths (`/html/body/div`, `//li`) and relative paths
//!   (`a`, `./a`, `.//a`, `../span`)
//! - name tests and `*`
//! - predicates: `[2]`, `[last()]`, `[@href]`, `[@class='x']`,
//!   `[@class!='x']`, `[contains(@class,'x')]`, `[starts-with(@href,'x')]`,
//!   `[text()='x']`
//!
//! Only element-valued paths are accepted. Steps such as `@href` or
//! `text()` are rejected; the field's extraction mode reads attributes and
//! text instead.

use crate::SelectorError;
use scraper::node::{Element, Node};
use scraper::ElementRef;
use std::collections::HashSet;

/// A compiled path query
#[derive(Debug, Clone, PartialEq)]
pub struct PathQuery {
    absolute: bool,
    steps: Vec<Step>,
}

#[derive(Debug, Clone, PartialEq)]
struct Step {
    axis: Axis,
    test: NameTest,
    predicates: Vec<Predicate>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Axis {
    Child,
    /// `//x`: children named x of the context or any of its descendants
    Descendant,
    SelfNode,
    Parent,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum NameTest {
    Any,
    Name(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Predicate {
    Position(usize),
    Last,
    HasAttr(String),
    AttrEq(String, String),
    AttrNe(String, String),
    AttrContains(String, String),
    AttrStartsWith(String, String),
    TextEq(String),
}

impl PathQuery {
    /// Compiles a path query
    pub fn parse(query: &str) -> Result<Self, SelectorError> {
        Parser::new(query).parse()
    }

    /// Every element matched from `context`, in document order
    pub fn select<'a>(&self, context: ElementRef<'a>) -> Vec<ElementRef<'a>> {
        let root = document_root(context);
        let mut steps = self.steps.iter();

        let mut current = if self.absolute {
            // The document node's only element child is the root element
            let Some(first) = steps.next() else {
                return Vec::new();
            };
            let mut groups = vec![vec![root]
                .into_iter()
                .filter(|el| first.test.matches(el.value()))
                .collect::<Vec<_>>()];
            if first.axis == Axis::Descendant {
                groups.extend(first.groups(root));
            }
            first.finish(groups, root)
        } else {
            vec![context]
        };

        for step in steps {
            let groups = current.iter().flat_map(|node| step.groups(*node)).collect();
            current = step.finish(groups, root);
        }

        current
    }

    /// First match in document order
    pub fn select_first<'a>(&self, context: ElementRef<'a>) -> Option<ElementRef<'a>> {
        self.select(context).into_iter().next()
    }
}

impl Step {
    /// Candidate groups for one context node; predicates apply per group
    fn groups<'a>(&self, node: ElementRef<'a>) -> Vec<Vec<ElementRef<'a>>> {
        match self.axis {
            Axis::Child => vec![self.matching_children(node)],
            Axis::Descendant => node
                .descendants()
                .filter_map(ElementRef::wrap)
                .map(|el| self.matching_children(el))
                .collect(),
            Axis::SelfNode => vec![vec![node]],
            Axis::Parent => vec![node
                .parent()
                .and_then(ElementRef::wrap)
                .into_iter()
                .collect()],
        }
    }

    fn matching_children<'a>(&self, node: ElementRef<'a>) -> Vec<ElementRef<'a>> {
        node.children()
            .filter_map(ElementRef::wrap)
            .filter(|el| self.test.matches(el.value()))
            .collect()
    }

    /// Applies predicates to each group and merges the survivors in document order
    fn finish<'a>(
        &self,
        groups: Vec<Vec<ElementRef<'a>>>,
        root: ElementRef<'a>,
    ) -> Vec<ElementRef<'a>> {
        let mut matched: Vec<ElementRef<'a>> = groups
            .into_iter()
            .flat_map(|group| apply_predicates(group, &self.predicates))
            .collect();

        if matched.len() < 2 {
            return matched;
        }

        let keys: HashSet<*const Element> = matched.iter().map(|el| node_key(el)).collect();
        matched.clear();
        matched.extend(
            root.descendants()
                .filter_map(ElementRef::wrap)
                .filter(|el| keys.contains(&node_key(el))),
        );
        matched
    }
}

impl NameTest {
    fn matches(&self, element: &Element) -> bool {
        match self {
            Self::Any => true,
            Self::Name(name) => element.name().eq_ignore_ascii_case(name),
        }
    }
}

impl Predicate {
    fn matches(&self, element: ElementRef<'_>, position: usize, last: usize) -> bool {
        let el = element.value();
        match self {
            Self::Position(n) => position == *n,
            Self::Last => position == last,
            Self::HasAttr(name) => el.attr(name).is_some(),
            Self::AttrEq(name, value) => el.attr(name) == Some(value.as_str()),
            Self::AttrNe(name, value) => el.attr(name).is_some_and(|v| v != value.as_str()),
            Self::AttrContains(name, value) => {
                el.attr(name).is_some_and(|v| v.contains(value.as_str()))
            }
            Self::AttrStartsWith(name, value) => {
                el.attr(name).is_some_and(|v| v.starts_with(value.as_str()))
            }
            Self::TextEq(value) => element.children().any(|child| match child.value() {
                Node::Text(text) => &*text.text == value.as_str(),
                _ => false,
            }),
        }
    }
}

fn apply_predicates<'a>(group: Vec<ElementRef<'a>>, predicates: &[Predicate]) -> Vec<ElementRef<'a>> {
    predicates.iter().fold(group, |group, predicate| {
        let last = group.len();
        group
            .into_iter()
            .enumerate()
            .filter(|(i, el)| predicate.matches(*el, i + 1, last))
            .map(|(_, el)| el)
            .collect()
    })
}

fn document_root(element: ElementRef<'_>) -> ElementRef<'_> {
    element
        .ancestors()
        .filter_map(ElementRef::wrap)
        .last()
        .unwrap_or(element)
}

fn node_key(element: &ElementRef<'_>) -> *const Element {
    element.value() as *const Element
}

struct Parser<'q> {
    query: &'q str,
    rest: &'q str,
}

impl<'q> Parser<'q> {
    fn new(query: &'q str) -> Self {
        Self {
            query,
            rest: query.trim(),
        }
    }

    fn error(&self, message: impl Into<String>) -> SelectorError {
        SelectorError::Path {
            query: self.query.to_string(),
            message: message.into(),
        }
    }

    fn eat(&mut self, token: &str) -> bool {
        match self.rest.strip_prefix(token) {
            Some(rest) => {
                self.rest = rest;
                true
            }
            None => false,
        }
    }

    fn skip_ws(&mut self) {
        self.rest = self.rest.trim_start();
    }

    fn expect(&mut self, token: &str) -> Result<(), SelectorError> {
        self.skip_ws();
        if self.eat(token) {
            Ok(())
        } else {
            Err(self.error(format!("expected '{}' at '{}'", token, self.rest)))
        }
    }

    fn parse(mut self) -> Result<PathQuery, SelectorError> {
        if self.rest.is_empty() {
            return Err(self.error("empty query"));
        }

        let (absolute, mut axis) = if self.eat("//") {
            (true, Axis::Descendant)
        } else if self.eat("/") {
            if self.rest.is_empty() {
                return Err(self.error("selecting the document node is not supported"));
            }
            (true, Axis::Child)
        } else {
            (false, Axis::Child)
        };

        let mut steps = Vec::new();
        loop {
            let step = self.parse_step(axis)?;
            if absolute && steps.is_empty() && matches!(step.axis, Axis::SelfNode | Axis::Parent) {
                return Err(self.error("'.' and '..' cannot follow the document root"));
            }
            steps.push(step);

            if self.rest.is_empty() {
                break;
            }
            axis = if self.eat("//") {
                Axis::Descendant
            } else if self.eat("/") {
                Axis::Child
            } else if self.rest.starts_with('|') {
                return Err(self.error("unions are not supported"));
            } else {
                return Err(self.error(format!("unexpected input '{}'", self.rest)));
            };
        }

        Ok(PathQuery { absolute, steps })
    }

    fn parse_step(&mut self, axis: Axis) -> Result<Step, SelectorError> {
        if self.rest.starts_with('.') {
            if axis == Axis::Descendant {
                return Err(self.error("'.' and '..' cannot follow '//'"));
            }
            let axis = if self.eat("..") {
                Axis::Parent
            } else {
                self.eat(".");
                Axis::SelfNode
            };
            return Ok(Step {
                axis,
                test: NameTest::Any,
                predicates: Vec::new(),
            });
        }

        if self.rest.starts_with('@') {
            return Err(self.error("attribute steps are not supported, use an attribute field"));
        }

        let test = if self.eat("*") {
            NameTest::Any
        } else {
            let name = self.parse_name();
            if name.is_empty() {
                return Err(self.error(format!("expected a name at '{}'", self.rest)));
            }
            if self.rest.starts_with('(') {
                return Err(self.error(format!("'{}()' steps are not supported", name)));
            }
            if self.rest.starts_with("::") {
                return Err(self.error(format!("axis '{}::' is not supported", name)));
            }
            NameTest::Name(name.to_ascii_lowercase())
        };

        let mut predicates = Vec::new();
        while self.eat("[") {
            predicates.push(self.parse_predicate()?);
            self.expect("]")?;
        }

        Ok(Step {
            axis,
            test,
            predicates,
        })
    }

    fn parse_name(&mut self) -> String {
        let end = self
            .rest
            .find(|c: char| !(c.is_alphanumeric() || c == '_' || c == '-'))
            .unwrap_or(self.rest.len());
        let name = self.rest[..end].to_string();
        self.rest = &self.rest[end..];
        name
    }

    fn parse_predicate(&mut self) -> Result<Predicate, SelectorError> {
        self.skip_ws();

        if self.rest.starts_with(|c: char| c.is_ascii_digit()) {
            let end = self
                .rest
                .find(|c: char| !c.is_ascii_digit())
                .unwrap_or(self.rest.len());
            let position: usize = self.rest[..end]
                .parse()
                .map_err(|_| self.error("position is too large"))?;
            if position == 0 {
                return Err(self.error("positions start at 1"));
            }
            self.rest = &self.rest[end..];
            return Ok(Predicate::Position(position));
        }

        if self.eat("last()") {
            return Ok(Predicate::Last);
        }

        if self.eat("@") {
            let name = self.parse_attr_name()?;
            self.skip_ws();
            if self.eat("!=") {
                return Ok(Predicate::AttrNe(name, self.parse_literal()?));
            }
            if self.eat("=") {
                return Ok(Predicate::AttrEq(name, self.parse_literal()?));
            }
            return Ok(Predicate::HasAttr(name));
        }

        if self.eat("contains(") {
            let (name, value) = self.parse_attr_call()?;
            return Ok(Predicate::AttrContains(name, value));
        }

        if self.eat("starts-with(") {
            let (name, value) = self.parse_attr_call()?;
            return Ok(Predicate::AttrStartsWith(name, value));
        }

        if self.eat("text()") {
            self.expect("=")?;
            return Ok(Predicate::TextEq(self.parse_literal()?));
        }

        Err(self.error(format!("unsupported predicate at '{}'", self.rest)))
    }

    fn parse_attr_name(&mut self) -> Result<String, SelectorError> {
        let name = self.parse_name();
        if name.is_empty() {
            return Err(self.error("expected an attribute name after '@'"));
        }
        Ok(name.to_ascii_lowercase())
    }

    /// `@name, 'value')` after a function name
    fn parse_attr_call(&mut self) -> Result<(String, String), SelectorError> {
        self.expect("@")?;
        let name = self.parse_attr_name()?;
        self.expect(",")?;
        let value = self.parse_literal()?;
        self.expect(")")?;
        Ok((name, value))
    }

    fn parse_literal(&mut self) -> Result<String, SelectorError> {
        self.skip_ws();
        let quote = match self.rest.chars().next() {
            Some(q @ ('\'' | '"')) => q,
            _ => return Err(self.error(format!("expected a quoted string at '{}'", self.rest))),
        };
        let body = &self.rest[1..];
        let end = body
            .find(quote)
            .ok_or_else(|| self.error("unterminated string"))?;
        let literal = body[..end].to_string();
        self.rest = &body[end + 1..];
        Ok(literal)
    }
}
