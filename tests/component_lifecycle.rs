//! Lifecycle component: a mount effect plus a scoped style, composed under
//! a parent component.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use spark_dom::{
    Attrs, Cleanup, Component, Effect, MountState, NodeId, Parent, Result, Style, dispatch,
    element, if_block, is_alive, listen, render_html, reset_document, style_count, stylesheet,
    text,
};

type Log = Rc<RefCell<Vec<String>>>;

struct ComponentA {
    component: Component,
    style: Style,
    p: NodeId,
}

fn component_a(log: &Log, parent: impl Into<Parent>) -> Result<ComponentA> {
    let effect = Effect::new({
        let log = log.clone();
        move || {
            log.borrow_mut().push("component A mounted".into());
            let log = log.clone();
            Box::new(move || log.borrow_mut().push("component A unmounted".into())) as Cleanup
        }
    });

    let style = Style::scoped(|id| {
        format!(
            "{} {{ padding: 12px; border: 1px dashed blue; color: blue; }}",
            id.selector("p")
        )
    });

    let p = element("p", Attrs::from([("class", style.id().as_str())]), parent)?;
    text("A", p)?;

    let component = Component::new("A");
    component.on_mount(&effect)?;
    component.register(&style)?.register(p)?;

    Ok(ComponentA { component, style, p })
}

#[test]
fn test_effect_fires_on_mount_only() {
    reset_document();
    let log: Log = Rc::new(RefCell::new(Vec::new()));

    let a = component_a(&log, Parent::Root).unwrap();
    assert!(log.borrow().is_empty());
    assert_eq!(
        render_html().unwrap(),
        format!("<p class=\"{}\">A</p>", a.style.id())
    );
    assert!(stylesheet().contains("color: blue"));

    a.component.mount().unwrap();
    a.component.mount().unwrap();
    assert_eq!(*log.borrow(), vec!["component A mounted"]);

    a.component.unmount();
    a.component.unmount();
    assert_eq!(
        *log.borrow(),
        vec!["component A mounted", "component A unmounted"]
    );
    assert_eq!(a.component.state(), MountState::Unmounted);
    assert!(is_alive(a.p), "unmount keeps nodes");
}

#[test]
fn test_remount_pairs_teardowns() {
    reset_document();
    let log: Log = Rc::new(RefCell::new(Vec::new()));
    let a = component_a(&log, Parent::Root).unwrap();

    for _ in 0..3 {
        a.component.mount().unwrap();
        a.component.unmount();
    }
    let log = log.borrow();
    let unmounted = log.iter().filter(|l| l.ends_with("unmounted")).count();
    let mounted = log.iter().filter(|l| l.ends_with("mounted")).count() - unmounted;
    assert_eq!(mounted, 3);
    assert_eq!(unmounted, 3);
}

#[test]
fn test_dispose_tears_down_once() {
    reset_document();
    let log: Log = Rc::new(RefCell::new(Vec::new()));
    let a = component_a(&log, Parent::Root).unwrap();

    a.component.mount().unwrap();
    a.component.dispose().unwrap();
    a.component.dispose().unwrap();

    assert_eq!(
        *log.borrow(),
        vec!["component A mounted", "component A unmounted"]
    );
    assert!(a.style.is_disposed());
    assert_eq!(style_count(), 0);
    assert!(!is_alive(a.p));
    assert_eq!(render_html().unwrap(), "");
}

#[test]
fn test_nested_under_conditional_parent() {
    reset_document();
    let log: Log = Rc::new(RefCell::new(Vec::new()));

    let visible = Rc::new(Cell::new(true));
    let app = Component::new("App");
    let predicate = {
        let visible = visible.clone();
        move || visible.get()
    };
    let block = if_block(predicate, Parent::Root).unwrap();
    let button = element("button", Attrs::new(), Parent::Root).unwrap();
    text("toggle", button).unwrap();

    let a = component_a(&log, &block).unwrap();
    app.register(&block).unwrap();
    app.register(&a.component).unwrap();
    let flip = {
        let visible = visible.clone();
        move || visible.set(!visible.get())
    };
    let reconcile = {
        let block = block.clone();
        move || block.toggle().map(|_| ())
    };
    app.register(listen(button, "click", flip, reconcile).unwrap()).unwrap();
    app.register(button).unwrap();

    app.mount().unwrap();
    assert_eq!(*log.borrow(), vec!["component A mounted"]);
    assert!(a.component.is_mounted());

    dispatch(button, "click").unwrap();
    assert_eq!(render_html().unwrap(), "<button>toggle</button>");
    assert!(is_alive(a.p), "hiding keeps the subtree");

    dispatch(button, "click").unwrap();
    assert!(render_html().unwrap().starts_with("<p class="));

    app.dispose().unwrap();
    assert_eq!(a.component.state(), MountState::Disposed);
    assert_eq!(
        *log.borrow(),
        vec!["component A mounted", "component A unmounted"]
    );
    assert_eq!(spark_dom::node_count(), 0);
}
