mod dispatch;
mod engine;
mod normalize;
