//! Pan/zoom transform, viewport fitting and hit geometry.

/// Zoom limits shared by fitting and wheel zoom.
pub const MIN_ZOOM: f64 = 0.1;
pub const MAX_ZOOM: f64 = 10.0;

/// Axis-aligned box in graph space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
	pub x1: f64,
	pub y1: f64,
	pub x2: f64,
	pub y2: f64,
}

impl Rect {
	/// Box of size `w` x `h` centered on `(cx, cy)`.
	pub fn centered(cx: f64, cy: f64, w: f64, h: f64) -> Self {
		Self {
			x1: cx - w / 2.0,
			y1: cy - h / 2.0,
			x2: cx + w / 2.0,
			y2: cy + h / 2.0,
		}
	}

	pub fn width(&self) -> f64 {
		self.x2 - self.x1
	}

	pub fn height(&self) -> f64 {
		self.y2 - self.y1
	}

	pub fn center(&self) -> (f64, f64) {
		((self.x1 + self.x2) / 2.0, (self.y1 + self.y2) / 2.0)
	}

	pub fn contains(&self, x: f64, y: f64) -> bool {
		x >= self.x1 && x <= self.x2 && y >= self.y1 && y <= self.y2
	}

	pub fn union(self, other: Rect) -> Rect {
		Rect {
			x1: self.x1.min(other.x1),
			y1: self.y1.min(other.y1),
			x2: self.x2.max(other.x2),
			y2: self.y2.max(other.y2),
		}
	}

	pub fn expand(self, by: f64) -> Rect {
		Rect {
			x1: self.x1 - by,
			y1: self.y1 - by,
			x2: self.x2 + by,
			y2: self.y2 + by,
		}
	}

	/// Smallest box enclosing all `rects`, or `None` when empty.
	pub fn enclosing(rects: impl IntoIterator<Item = Rect>) -> Option<Rect> {
		rects.into_iter().reduce(Rect::union)
	}
}

/// Pan and zoom transform applied to the entire graph view.
#[derive(Clone, Debug, PartialEq)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	/// Zoom factor (1.0 = 100%, clamped to 0.1..10.0).
	pub k: f64,
}

impl Default for ViewTransform {
	fn default() -> Self {
		Self {
			x: 0.0,
			y: 0.0,
			k: 1.0,
		}
	}
}

impl ViewTransform {
	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> (f64, f64) {
		((sx - self.x) / self.k, (sy - self.y) / self.k)
	}

	/// Frames `bounds` in a `width` x `height` viewport, keeping `padding`
	/// screen pixels free on every side.
	pub fn fit(bounds: Rect, padding: f64, width: f64, height: f64) -> Self {
		let (avail_w, avail_h) = (
			(width - 2.0 * padding).max(1.0),
			(height - 2.0 * padding).max(1.0),
		);
		let k = if bounds.width() > 0.0 && bounds.height() > 0.0 {
			(avail_w / bounds.width()).min(avail_h / bounds.height())
		} else {
			1.0
		}
		.clamp(MIN_ZOOM, MAX_ZOOM);
		let (cx, cy) = bounds.center();
		Self {
			x: width / 2.0 - cx * k,
			y: height / 2.0 - cy * k,
			k,
		}
	}

	/// Zooms by `factor` around the screen point `(sx, sy)`.
	pub fn zoom_at(&mut self, sx: f64, sy: f64, factor: f64) {
		let new_k = (self.k * factor).clamp(MIN_ZOOM, MAX_ZOOM);
		let ratio = new_k / self.k;
		self.x = sx - (sx - self.x) * ratio;
		self.y = sy - (sy - self.y) * ratio;
		self.k = new_k;
	}
}

/// Distance from `(px, py)` to the segment `(x1, y1)`-`(x2, y2)`.
pub fn distance_to_segment(px: f64, py: f64, x1: f64, y1: f64, x2: f64, y2: f64) -> f64 {
	let (dx, dy) = (x2 - x1, y2 - y1);
	let len_sq = dx * dx + dy * dy;
	let t = if len_sq > 0.0 {
		(((px - x1) * dx + (py - y1) * dy) / len_sq).clamp(0.0, 1.0)
	} else {
		0.0
	};
	let (cx, cy) = (x1 + t * dx, y1 + t * dy);
	((px - cx).powi(2) + (py - cy).powi(2)).sqrt()
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn fit_centers_and_scales_bounds() {
		let bounds = Rect {
			x1: 0.0,
			y1: 0.0,
			x2: 200.0,
			y2: 100.0,
		};
		let t = ViewTransform::fit(bounds, 50.0, 500.0, 300.0);
		// 400 px wide / 200 vs 200 px high / 100
		assert_eq!(t.k, 2.0);
		assert_eq!(t.x, 250.0 - 100.0 * 2.0);
		assert_eq!(t.y, 150.0 - 50.0 * 2.0);
		let (gx, gy) = t.screen_to_graph(250.0, 150.0);
		assert_eq!((gx, gy), (100.0, 50.0));
	}

	#[test]
	fn fit_clamps_zoom() {
		let tiny = Rect::centered(0.0, 0.0, 0.001, 0.001);
		assert_eq!(ViewTransform::fit(tiny, 0.0, 800.0, 600.0).k, MAX_ZOOM);
		let huge = Rect::centered(0.0, 0.0, 1e9, 1e9);
		assert_eq!(ViewTransform::fit(huge, 0.0, 800.0, 600.0).k, MIN_ZOOM);
	}

	#[test]
	fn zoom_keeps_anchor_point_fixed() {
		let mut t = ViewTransform {
			x: 10.0,
			y: 20.0,
			k: 1.0,
		};
		let before = t.screen_to_graph(100.0, 100.0);
		t.zoom_at(100.0, 100.0, 2.0);
		let after = t.screen_to_graph(100.0, 100.0);
		assert!((before.0 - after.0).abs() < 1e-9);
		assert!((before.1 - after.1).abs() < 1e-9);
	}

	#[test]
	fn enclosing_unions_rects() {
		let r = Rect::enclosing([
			Rect::centered(0.0, 0.0, 2.0, 2.0),
			Rect::centered(10.0, 5.0, 2.0, 2.0),
		])
		.unwrap();
		assert_eq!(r, Rect { x1: -1.0, y1: -1.0, x2: 11.0, y2: 6.0 });
		assert!(Rect::enclosing(Vec::<Rect>::new()).is_none());
	}

	#[test]
	fn segment_distance() {
		assert_eq!(distance_to_segment(5.0, 3.0, 0.0, 0.0, 10.0, 0.0), 3.0);
		assert_eq!(distance_to_segment(-4.0, 3.0, 0.0, 0.0, 10.0, 0.0), 5.0);
	}
}
