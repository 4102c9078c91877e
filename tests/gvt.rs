use std::cell::RefCell;
use std::rc::Rc;

use once_cell::sync::Lazy;

use svgbridge::gvt::{GraphicsNode, GvtBuilder, GvtNodeId};
use svgbridge::svgtree::{self, Document, EId};
use svgbridge::{BridgeContext, BridgeError, ErrorReporter, FuzzyEq, Options, Rect};

static OPTIONS: Lazy<Options> = Lazy::new(Options::default);

#[derive(Clone, Default)]
struct Errors(Rc<RefCell<Vec<BridgeError>>>);

impl ErrorReporter for Errors {
    fn report(&self, error: &BridgeError) {
        self.0.borrow_mut().push(error.clone());
    }
}

fn bounds_of(ctx: &BridgeContext, id: &str) -> Option<Rect> {
    ctx.geometry_bounds(ctx.graphics_node_by_id(id)?)
}

fn svg(content: &str) -> String {
    format!(
        "<svg xmlns='http://www.w3.org/2000/svg' xmlns:xlink='http://www.w3.org/1999/xlink' \
              width='200' height='100'>{}</svg>",
        content
    )
}

#[test]
fn shape_bounds() {
    let text = svg("
        <rect id='rect1' x='10' y='20' width='50%' height='50%'/>
        <circle id='circle1' cx='50' cy='50' r='10'/>
        <ellipse id='ellipse1' cx='50' cy='50' rx='20' ry='10'/>
        <line id='line1' x1='10' y1='50' x2='5' y2='0'/>
        <polyline id='polyline1' points='10 10, 30 -5, 20 40'/>
        <path id='path1' d='M 10 10 L 50 10 L 50 60 Z'/>
        <rect id='rect2' width='0' height='10'/>
        <path id='path2' d=''/>
    ");

    let doc = Document::parse(&text).unwrap();
    let ctx = BridgeContext::new(&doc, &OPTIONS);
    ctx.build_root();

    let check = |id: &str, r: Rect| {
        let bounds = bounds_of(&ctx, id).unwrap();
        assert!(bounds.fuzzy_eq(&r), "{}: {}", id, bounds);
    };

    check("rect1", Rect::new(10.0, 20.0, 100.0, 50.0));
    check("circle1", Rect::new(40.0, 40.0, 20.0, 20.0));
    check("ellipse1", Rect::new(30.0, 40.0, 40.0, 20.0));
    check("line1", Rect::new(5.0, 0.0, 5.0, 50.0));
    check("polyline1", Rect::new(10.0, -5.0, 20.0, 45.0));
    check("path1", Rect::new(10.0, 10.0, 40.0, 50.0));

    // Invalid shapes are still rendered, but have no geometry.
    assert!(ctx.graphics_node_by_id("rect2").is_some());
    assert!(bounds_of(&ctx, "rect2").is_none());
    assert!(bounds_of(&ctx, "path2").is_none());
}

#[test]
fn group_bounds() {
    let text = svg("
        <g id='g1' transform='translate(100 0)'>
            <rect width='10' height='10' transform='scale(2)'/>
            <g id='g2'>
                <rect x='30' y='30' width='10' height='10'/>
            </g>
            <g id='g3'/>
        </g>
    ");

    let doc = Document::parse(&text).unwrap();
    let ctx = BridgeContext::new(&doc, &OPTIONS);
    let root = ctx.build_root().unwrap();

    // The own transform is not applied.
    assert!(bounds_of(&ctx, "g1").unwrap().fuzzy_eq(&Rect::new(0.0, 0.0, 40.0, 40.0)));
    assert!(bounds_of(&ctx, "g3").is_none());

    let root = ctx.graphics_node(root).unwrap();
    assert_eq!(root.tag, EId::Svg);
    assert!(root.bounds.unwrap().fuzzy_eq(&Rect::new(100.0, 0.0, 40.0, 40.0)));

    let g1 = ctx.graphics_node_by_id("g1").unwrap();
    let g2 = ctx.graphics_node_by_id("g2").unwrap();
    assert_eq!(ctx.graphics_node(g1).unwrap().children.len(), 3);
    assert_eq!(ctx.graphics_node(g2).unwrap().parent, Some(g1));
}

#[test]
fn use_element() {
    let text = svg("
        <defs>
            <rect id='rect1' width='10' height='10'/>
            <symbol id='sym1'>
                <circle r='5'/>
            </symbol>
        </defs>
        <use id='use1' xlink:href='#rect1' x='20' y='30'/>
        <use id='use2' xlink:href='#sym1'/>
        <use id='use3' xlink:href='#use3'/>
    ");

    let doc = Document::parse(&text).unwrap();
    let errors = Errors::default();
    let ctx = BridgeContext::new(&doc, &OPTIONS).with_reporter(errors.clone());
    ctx.build_root();

    let use1 = ctx.graphics_node(ctx.graphics_node_by_id("use1").unwrap()).unwrap();
    assert!(use1.bounds.unwrap().fuzzy_eq(&Rect::new(0.0, 0.0, 10.0, 10.0)));
    assert!(use1.transformed_bounds().unwrap().fuzzy_eq(&Rect::new(20.0, 30.0, 10.0, 10.0)));

    assert!(bounds_of(&ctx, "use2").unwrap().fuzzy_eq(&Rect::new(-5.0, -5.0, 10.0, 10.0)));

    assert!(ctx.graphics_node_by_id("use3").is_none());
    assert_eq!(*errors.0.borrow(), vec![BridgeError::CircularReference("use3".to_string())]);
}

#[test]
fn not_rendered() {
    let text = svg("
        <rect id='rect1' width='10' height='10' display='none'/>
        <g display='none'>
            <rect id='rect2' width='10' height='10'/>
        </g>
        <symbol>
            <rect id='rect3' width='10' height='10'/>
        </symbol>
        <text id='text1'>Text</text>
    ");

    let doc = Document::parse(&text).unwrap();
    let ctx = BridgeContext::new(&doc, &OPTIONS);
    ctx.build_root();

    for id in &["rect1", "rect2", "rect3", "text1"] {
        assert!(ctx.graphics_node_by_id(id).is_none(), "{}", id);
    }
}

#[test]
fn malformed_length() {
    let text = svg("
        <rect id='rect1' width='qwe' height='10'/>
        <rect id='rect2' width='10' height='10'/>
    ");

    let doc = Document::parse(&text).unwrap();
    let errors = Errors::default();
    let ctx = BridgeContext::new(&doc, &OPTIONS).with_reporter(errors.clone());
    ctx.build_root();

    assert!(ctx.graphics_node_by_id("rect1").is_none());
    assert!(ctx.graphics_node_by_id("rect2").is_some());

    let errors = errors.0.borrow();
    assert_eq!(errors.len(), 1);
    assert!(matches!(errors[0], BridgeError::MalformedLength { .. }));
}

#[test]
fn unbind() {
    let text = svg("<rect id='rect1' width='10' height='10'/>");

    let doc = Document::parse(&text).unwrap();
    let ctx = BridgeContext::new(&doc, &OPTIONS);
    ctx.build_root();

    let element = doc.element_by_id("rect1").unwrap();
    let node = ctx.node_of(element).unwrap();
    assert_eq!(ctx.element_of(node), Some(element));

    assert_eq!(ctx.unbind(element), Some(node));
    assert_eq!(ctx.node_of(element), None);
    assert_eq!(ctx.element_of(node), None);

    // The node itself is still alive.
    assert!(ctx.graphics_node(node).is_some());
    assert_eq!(ctx.unbind(element), None);
}

/// Builds a single fixed-size node for every element.
struct SquareBuilder;

impl GvtBuilder for SquareBuilder {
    fn build(
        &self,
        ctx: &BridgeContext,
        element: svgtree::Node,
    ) -> Result<Option<GvtNodeId>, BridgeError> {
        let tag = match element.tag_name() {
            Some(tag) => tag,
            None => return Ok(None),
        };

        let id = ctx.insert_node(GraphicsNode::new(tag, Some(Rect::new(0.0, 0.0, 50.0, 50.0))));
        ctx.bind(element, id);
        Ok(Some(id))
    }
}

#[test]
fn custom_builder() {
    let text = svg("
        <filter id='f1'>
            <feImage xlink:href='#text1'/>
        </filter>
        <text id='text1'>Text</text>
    ");

    let doc = Document::parse(&text).unwrap();
    let ctx = BridgeContext::new(&doc, &OPTIONS).with_gvt_builder(SquareBuilder);

    let root = ctx.build_root().unwrap();
    assert_eq!(ctx.graphics_node(root).unwrap().tag, EId::Svg);

    let text1 = doc.element_by_id("text1").unwrap();
    let id = ctx.build_graphics_node(text1).unwrap().unwrap();
    assert!(ctx.geometry_bounds(id).unwrap().fuzzy_eq(&Rect::new(0.0, 0.0, 50.0, 50.0)));

    let filter = doc.element_by_id("f1").unwrap();
    let chain = svgbridge::filter::FilterChainBuilder::new(ctx.registry())
        .build(id, &ctx, filter, text1)
        .unwrap()
        .unwrap();
    assert!(chain.region.fuzzy_eq(&Rect::new(-5.0, -5.0, 60.0, 60.0)));
}
