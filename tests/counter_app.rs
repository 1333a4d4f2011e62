//! Counter application: text updates plus a scoped style whose color rule
//! flips at |n| >= 10.

use spark_dom::{
    Attrs, Component, NodeId, Owned, Parent, Result, State, Style, StyleId, dispatch, element,
    listen, render_html, reset_document, set_text, space, style_id, text, text_content,
};

struct CounterApp {
    component: Component,
    n: State<i64>,
    sid: StyleId,
    style: Style,
    p: NodeId,
    minus: NodeId,
    plus: NodeId,
}

fn counter_css(id: &StyleId, n: i64) -> String {
    let color = if n.abs() >= 10 { "red" } else { "green" };
    format!(
        "{} {{ color: {color}; }}\n\
         {} {{ display: inline-block; width: 24px; height: 24px; font-weight: bold; }}",
        id.selector("p"),
        id.selector("button"),
    )
}

fn build() -> Result<CounterApp> {
    let sid = style_id();
    let n = State::new(0i64);

    let class = || Attrs::from([("class", sid.as_str())]);

    let p = element("p", class(), Parent::Root)?;
    text("current count is ", p)?;
    let count = text(n.get().to_string(), p)?;
    let s = space(Parent::Root)?;
    let minus = element("button", class(), Parent::Root)?;
    text("-", minus)?;
    let s2 = space(Parent::Root)?;
    let plus = element("button", class(), Parent::Root)?;
    text("+", plus)?;

    let style = Style::new(sid.clone(), {
        let n = n.clone();
        move |id| counter_css(id, n.get())
    })?;

    let update = {
        let (n, style) = (n.clone(), style.clone());
        move || -> Result<()> {
            set_text(count, n.get().to_string())?;
            style.update()
        }
    };

    let component = Component::new("CounterApp");
    let nodes: [Owned; 6] = [
        style.clone().into(),
        p.into(),
        s.into(),
        minus.into(),
        s2.into(),
        plus.into(),
    ];
    component.register_all(nodes)?;

    let decrement = {
        let n = n.clone();
        move || n.update(|v| *v -= 1)
    };
    let increment = {
        let n = n.clone();
        move || n.update(|v| *v += 1)
    };
    component.register(listen(minus, "click", decrement, update.clone())?)?;
    component.register(listen(plus, "click", increment, update)?)?;
    component.mount()?;

    Ok(CounterApp {
        component,
        n,
        sid,
        style,
        p,
        minus,
        plus,
    })
}

fn color(app: &CounterApp) -> &'static str {
    let css = app.style.css_text().unwrap_or_default();
    if css.contains("color: red") {
        "red"
    } else if css.contains("color: green") {
        "green"
    } else {
        "none"
    }
}

#[test]
fn test_initial_state() {
    reset_document();
    let app = build().unwrap();

    assert_eq!(app.n.get(), 0);
    assert_eq!(text_content(app.p).unwrap(), "current count is 0");
    assert_eq!(color(&app), "green");
    assert_eq!(
        render_html().unwrap(),
        format!(
            "<p class=\"{0}\">current count is 0</p> \
             <button class=\"{0}\">-</button> <button class=\"{0}\">+</button>",
            app.sid
        )
    );
}

#[test]
fn test_plus_three_times() {
    reset_document();
    let app = build().unwrap();

    for _ in 0..3 {
        dispatch(app.plus, "click").unwrap();
    }
    assert_eq!(app.n.get(), 3);
    assert_eq!(text_content(app.p).unwrap(), "current count is 3");
    assert_eq!(color(&app), "green");
}

#[test]
fn test_color_flips_exactly_at_ten() {
    reset_document();
    let app = build().unwrap();

    for expected in 1..=10i64 {
        dispatch(app.minus, "click").unwrap();
        assert_eq!(app.n.get(), -expected);
        let want = if expected >= 10 { "red" } else { "green" };
        assert_eq!(color(&app), want, "at n = {}", -expected);
    }
    assert_eq!(text_content(app.p).unwrap(), "current count is -10");

    dispatch(app.plus, "click").unwrap();
    assert_eq!(color(&app), "green");
}

#[test]
fn test_style_only_changes_through_updater() {
    reset_document();
    let app = build().unwrap();

    app.n.set(42);
    assert_eq!(color(&app), "green");
    assert_eq!(text_content(app.p).unwrap(), "current count is 0");

    dispatch(app.plus, "click").unwrap();
    assert_eq!(color(&app), "red");
    assert_eq!(text_content(app.p).unwrap(), "current count is 43");
}

#[test]
fn test_dispose_removes_style_and_nodes() {
    reset_document();
    let app = build().unwrap();

    app.component.dispose().unwrap();
    assert!(app.style.is_disposed());
    assert_eq!(spark_dom::css_for(&app.sid), None);
    assert_eq!(spark_dom::node_count(), 0);
}
