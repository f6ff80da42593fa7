use criterion::{Criterion, black_box, criterion_group, criterion_main};
use dom::{Document, NodeId};

const BLOCKS: usize = 5_000;

fn make_document(blocks: usize) -> (Document, NodeId) {
    let mut doc = Document::new();
    let html = doc.create_element("html").expect("valid name");
    let body = doc.create_element("body").expect("valid name");
    doc.append_child(doc.root(), html).expect("empty document");
    doc.append_child(html, body).expect("html accepts children");
    for i in 0..blocks {
        let div = doc.create_element("div").expect("valid name");
        let span = doc.create_element("span").expect("valid name");
        doc.append_child(body, div).expect("body accepts children");
        doc.append_child(div, span).expect("div accepts children");
        if i % 4 == 0 {
            doc.set_attribute(div, "class", "box hot").expect("element");
        }
    }
    (doc, body)
}

fn bench_sequential_item(c: &mut Criterion) {
    let (doc, _) = make_document(BLOCKS);
    c.bench_function("bench_tag_list_sequential_item", |b| {
        b.iter(|| {
            let list = doc.elements_by_tag_name(doc.root(), "div");
            let mut index = 0;
            while let Some(node) = list.item(&doc, index) {
                black_box(node);
                index += 1;
            }
        });
    });
}

fn bench_reverse_item(c: &mut Criterion) {
    let (doc, _) = make_document(BLOCKS);
    let list = doc.elements_by_tag_name(doc.root(), "div");
    let len = list.length(&doc);
    c.bench_function("bench_tag_list_reverse_item", |b| {
        b.iter(|| {
            for index in (0..len).rev() {
                black_box(list.item(&doc, index));
            }
        });
    });
}

fn bench_class_length_after_mutation(c: &mut Criterion) {
    let (mut doc, body) = make_document(BLOCKS);
    let list = doc.elements_by_class_name(body, "hot");
    c.bench_function("bench_class_list_length_after_mutation", |b| {
        b.iter(|| {
            let div = doc.create_element("div").expect("valid name");
            doc.append_child(body, div).expect("body accepts children");
            black_box(list.length(&doc));
            doc.remove_child(body, div).expect("just appended");
        });
    });
}

criterion_group!(
    benches,
    bench_sequential_item,
    bench_reverse_item,
    bench_class_length_after_mutation
);
criterion_main!(benches);
