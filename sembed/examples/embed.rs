//! Run as `cargo run --example embed <tokenizer.json> <config.json> <model.onnx> <task> <sequence>...`.

use std::env::args;

use log::info;
use sembed::{Builder, OnnxEncoder};

const TOKEN_SIZE: usize = 128;

fn main() {
    env_logger::init();

    let args = args().skip(1).collect::<Vec<_>>();
    let (tokenizer, config, model, task, sequences) = match args.as_slice() {
        [tokenizer, config, model, task, sequences @ ..] => {
            (tokenizer, config, model, task, sequences)
        }
        _ => panic!("missing arguments"),
    };

    let encoder = OnnxEncoder::from_file(model, TOKEN_SIZE).unwrap();
    let pipeline = Builder::from_files(tokenizer, config)
        .unwrap()
        .build(encoder)
        .unwrap();
    info!("Task {} has the id {}", task, pipeline.task_id_or_default(task));

    let embeddings = pipeline.run_batch(sequences).unwrap();
    for (sequence, embedding) in sequences.iter().zip(embeddings.outer_iter()) {
        println!("{}: {}", sequence, embedding);
    }
}
